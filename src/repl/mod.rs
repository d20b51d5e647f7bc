use std::io::{self, Write};

use ansi_term::Color;
use linefeed::{Interface, ReadResult, Terminal};

use crate::evaluator::{Fault, Session, Value};
use crate::printer;

static HISTORY_FILE: &str = "scalc.history";

fn configure_reader<T: Terminal>(reader: &Interface<T>) -> io::Result<()> {
    let mut reader = reader.lock_reader();
    reader.set_blink_matching_paren(true);

    let style = Color::Purple.bold();
    let text = "scalc=> ";

    reader.set_prompt(&format!(
        "\x01{prefix}\x02{text}\x01{suffix}\x02",
        prefix = style.prefix(),
        text = text,
        suffix = style.suffix()
    ))
}

pub fn run() -> io::Result<()> {
    let reader = Interface::new("scalc")?;
    configure_reader(&reader)?;

    if let Err(e) = reader.load_history(HISTORY_FILE) {
        if e.kind() == io::ErrorKind::NotFound {
            println!(
                "History file {} doesn't exist, not loading history.",
                HISTORY_FILE
            );
        } else {
            eprintln!("Could not load history file {}: {}", HISTORY_FILE, e);
        }
    }

    let mut session = Session::new();

    loop {
        match reader.read_line()? {
            ReadResult::Input(input) => {
                if input.len() == 0 {
                    continue;
                }
                reader.add_history_unique(input.clone());
                rep(&mut session, &input)?
            }
            ReadResult::Eof => {
                print!("^D");
                break;
            }
            ReadResult::Signal(signal) => {
                println!("signal: {:?}", signal);
                break;
            }
        }
    }

    if let Err(e) = reader.save_history(HISTORY_FILE) {
        eprintln!("Could not save history file {}: {}", HISTORY_FILE, e);
    }

    Ok(())
}

fn rep(session: &mut Session, input: &str) -> io::Result<()> {
    match session.eval(input) {
        // skip echoing the result of a form run only for its bindings or output
        Ok(Some(Value::Nothing)) => Ok(()),
        Ok(Some(value)) => printer::println_value_to(io::stdout(), &value),
        // diagnostics were already rendered to stderr
        Ok(None) => Ok(()),
        Err(fault) => report_fault(io::stderr(), &fault),
    }
}

fn report_fault(mut err: impl Write, fault: &Fault) -> io::Result<()> {
    writeln!(err, "fault: {}", fault)
}
