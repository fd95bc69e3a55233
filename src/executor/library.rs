//! Built-in keywords available to every script.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

pub const BUILTINS: &[&str] = &["log", "sleep", "set", "fail", "pass", "should_be_equal"];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name.to_lowercase().as_str())
}

fn expect_args(name: &str, args: &[String], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::Arity {
            name: name.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

/// Run a built-in keyword. `variables` is the script-global variable table.
pub fn call(name: &str, args: &[String], variables: &mut HashMap<String, String>) -> Result<()> {
    match name.to_lowercase().as_str() {
        "log" => {
            println!("{}", args.join(" "));
            Ok(())
        }
        "sleep" => {
            expect_args(name, args, 1)?;
            let millis: u64 = args[0].parse().map_err(|_| Error::InvalidArgument {
                name: name.to_string(),
                message: format!("'{}' is not a number of milliseconds", args[0]),
            })?;
            thread::sleep(Duration::from_millis(millis));
            Ok(())
        }
        "set" => {
            expect_args(name, args, 2)?;
            variables.insert(args[0].clone(), args[1].clone());
            Ok(())
        }
        "fail" => Err(Error::KeywordFailed {
            name: name.to_string(),
            message: args.join(" "),
        }),
        "pass" => Ok(()),
        "should_be_equal" => {
            expect_args(name, args, 2)?;
            if args[0] == args[1] {
                Ok(())
            } else {
                Err(Error::KeywordFailed {
                    name: name.to_string(),
                    message: format!("'{}' != '{}'", args[0], args[1]),
                })
            }
        }
        _ => Err(Error::KeywordFailed {
            name: name.to_string(),
            message: "not a built-in keyword".to_string(),
        }),
    }
}
