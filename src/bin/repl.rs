use ruleexpr::{Environment, Expr, RuleError, Scalar, parse};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

fn main() {
    env_logger::init();

    println!("Rule Expression REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type a rule to evaluate it, :help for commands, or Ctrl+D to exit.");
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("Error: cannot start line editor: {}", err);
            return;
        }
    };
    let mut env = Environment::new();

    loop {
        match rl.readline("rule> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                let (command, rest) = match line.split_once(char::is_whitespace) {
                    Some((command, rest)) => (command, rest.trim()),
                    None => (line, ""),
                };

                match command {
                    ":help" => print_help(),
                    ":env" => print_environment(&env),
                    ":quit" | ":exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    ":let" => match define(&mut env, rest) {
                        Ok(()) => {}
                        Err(msg) => println!("Error: {}", msg),
                    },
                    ":int" => report(parse(rest).and_then(|rule| rule.eval_int(&env))),
                    ":int64" => report(parse(rest).and_then(|rule| rule.eval_int64(&env))),
                    ":float" => report(parse(rest).and_then(|rule| rule.eval_float(&env))),
                    ":bool" => report(parse(rest).and_then(|rule| rule.eval_bool(&env))),
                    _ if command.starts_with(':') => {
                        println!("Unknown command {}, try :help", command)
                    }
                    _ => match parse(line) {
                        Ok(rule) => print_projections(&rule, &env),
                        Err(e) => println!("Error: {}", e),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted. Use Ctrl+D or :quit to exit.");
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
}

/// Handle `:let name value`; values with a point or exponent are floats
fn define(env: &mut Environment, args: &str) -> Result<(), String> {
    let (name, value) = args
        .split_once(char::is_whitespace)
        .ok_or_else(|| "usage: :let name value".to_string())?;
    let value = value.trim();

    let scalar = if value.contains(&['.', 'e', 'E'][..]) {
        let f = value.parse::<f64>().map_err(|e| e.to_string())?;
        if !f.is_finite() {
            return Err(format!("{} is not a finite float", value));
        }
        Scalar::Float(f)
    } else {
        value.parse::<i64>().map(Scalar::Int64).map_err(|e| e.to_string())?
    };

    env.define(name, scalar);
    Ok(())
}

fn report<T: std::fmt::Display>(result: Result<T, RuleError>) {
    match result {
        Ok(value) => println!("{}", value),
        Err(e) => println!("Error: {}", e),
    }
}

fn print_projections(rule: &Expr, env: &Environment) {
    fn show<T: std::fmt::Display>(result: Result<T, RuleError>) -> String {
        match result {
            Ok(value) => value.to_string(),
            Err(e) => format!("<{}>", e),
        }
    }

    println!("  int:   {}", show(rule.eval_int(env)));
    println!("  int64: {}", show(rule.eval_int64(env)));
    println!("  float: {}", show(rule.eval_float(env)));
    println!("  bool:  {}", show(rule.eval_bool(env)));
}

fn print_help() {
    println!("Commands:");
    println!("  :let name value  - Bind a variable (e.g. :let sale.Shop.ShopID 3)");
    println!("  :env             - Show current environment bindings");
    println!("  :int <rule>      - Evaluate as a native integer");
    println!("  :int64 <rule>    - Evaluate as a 64-bit integer");
    println!("  :float <rule>    - Evaluate as a float");
    println!("  :bool <rule>     - Evaluate as a boolean");
    println!("  :quit, :exit     - Exit the REPL");
    println!();
    println!("A bare rule is evaluated under all four projections.");
    println!("Operators: + - * / > >= < <= == != and && or || if in");
    println!();
    println!("Examples:");
    println!("  (+ (- id 1) 2 (+ 3 4))");
    println!("  (if (>= sale.Shop.ShopID 1) 10.1 0)");
    println!("  (in x 1 5 9)");
}

fn print_environment(env: &Environment) {
    if env.is_empty() {
        println!("(empty)");
        return;
    }
    let mut bindings: Vec<(&str, Scalar)> = env.iter().collect();
    bindings.sort_by(|a, b| a.0.cmp(b.0));
    for (name, value) in bindings {
        println!("  {} = {}", name, value);
    }
}
