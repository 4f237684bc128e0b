use colored::Colorize;
use diagonal_sudoku::{Grid, Solver};
use std::env;

fn main() {
    env_logger::init();

    let mut diagonal = false;
    let mut input = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--diagonal" | "-d" => diagonal = true,
            _ => input = Some(arg),
        }
    }
    let Some(input) = input else {
        eprintln!("Usage: diagonal-sudoku [--diagonal] <81-character grid>");
        return;
    };

    match Grid::parse(&input) {
        Ok(grid) => {
            println!("Input:\n{grid}");
        }
        Err(err) => {
            println!("{}", format!("{err}").red());
            return;
        }
    }

    let solver = Solver::new(diagonal);
    if solver.board().is_diagonal() {
        println!("Diagonal constraints enabled.");
    }
    match solver.solve(&input) {
        Ok(solution) => {
            println!(
                "Found a solution in {} search node(s).\n{}",
                solution.nodes(),
                solution.grid()
            );
            println!("{}", solution.grid().to_line());
        }
        Err(err) => {
            println!("{}", format!("{err}").red());
        }
    }
}
