use ruleexpr::{Environment, parse};
use serde::Serialize;

#[derive(Serialize)]
#[allow(non_snake_case)]
struct Shop {
    ShopID: i32,
}

#[derive(Serialize)]
#[allow(non_snake_case)]
struct Sale {
    SaleID: i64,
    SalePrice: f64,
    Shop: Option<Box<Shop>>,
}

fn main() {
    println!("=== Rule Expression Demo ===\n");

    let env = Environment::new().with("id", 10);
    let rule = "(+  (- id 1) 2 (+ 3 4))";
    println!("{}", rule);
    match parse(rule).and_then(|expr| expr.eval_int(&env)) {
        Ok(result) => println!("  => {}\n", result),
        Err(e) => println!("  Error: {}\n", e),
    }

    let sale = Sale {
        SaleID: 1,
        SalePrice: 2.2,
        Shop: Some(Box::new(Shop { ShopID: 3 })),
    };
    let env = match Environment::from_serialize(&sale, "sale") {
        Ok(env) => env,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    let rules = [
        "(if (>= sale.SaleID 1) 10.1 0)",
        "(if (== sale.Shop.ShopID 2.3) 5 0)",
        "(* sale.SalePrice (if (in sale.Shop.ShopID 1 3 5) 0.5 1))",
    ];
    for rule in rules {
        println!("{}", rule);
        match parse(rule).and_then(|expr| expr.eval_float(&env)) {
            Ok(result) => println!("  => {}\n", result),
            Err(e) => println!("  Error: {}\n", e),
        }
    }

    println!("=== Demo Complete ===");
}
