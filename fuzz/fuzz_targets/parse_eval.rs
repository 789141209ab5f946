#![no_main]

use libfuzzer_sys::fuzz_target;
use ruleexpr::{Environment, parse};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(rule) = parse(s) {
            let env = Environment::new().with("x", 1).with("y", 2.5).with("a.b", 3i64);
            let _ = rule.eval_int(&env);
            let _ = rule.eval_int64(&env);
            let _ = rule.eval_float(&env);
            let _ = rule.eval_bool(&env);
        }
    }
});
