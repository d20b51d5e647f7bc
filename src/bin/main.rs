use std::env;
use std::fs;
use std::io;
use std::process;

use scalc::evaluator::Session;
use scalc::printer;
use scalc::repl;

fn main() -> io::Result<()> {
    let mut args = env::args().skip(1);

    match args.next() {
        Some(path) => {
            let input = fs::read_to_string(&path)?;
            let mut session = Session::new();
            match session.eval_file(&path, &input) {
                Ok(Some(value)) => printer::println_value_to(io::stdout(), &value),
                Ok(None) => process::exit(1),
                Err(fault) => {
                    eprintln!("fault: {}", fault);
                    process::exit(2);
                }
            }
        }
        None => repl::run(),
    }
}
