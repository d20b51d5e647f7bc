use std::io;

use crate::evaluator::Value;

pub fn println_value_to(mut out: impl io::Write, value: &Value) -> io::Result<()> {
    writeln!(&mut out, "{}", value)
}
