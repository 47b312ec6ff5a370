use safe_result::{
    ConflictError, NotFoundError, Outcome, ResultError, Thrown, fail, inspect, thrown,
    try_result_sync, try_result_sync_with,
};

fn parse_quantity(input: &str) -> Result<u32, Thrown> {
    let quantity: u32 = input.trim().parse()?;
    if quantity == 0 {
        // Raise an arbitrary value, not an error type
        safe_result::raise(thrown!(Validation { field: "quantity", value: 0 }));
    }
    Ok(quantity)
}

fn reserve(sku: &str, quantity: u32) -> Outcome<u32> {
    if sku != "SKU-1" {
        fail!(NotFoundError, format!("unknown sku {sku}"));
    }
    if quantity > 10 {
        fail!(ConflictError, "not enough stock");
    }
    Outcome::ok(10 - quantity)
}

fn main() {
    println!("--- Basic Usage Example ---\n");

    // 1. Every failure path comes back as data
    for input in ["3", "three", "0"] {
        let (value, error) = try_result_sync(|| parse_quantity(input)).into_pair();
        match (value, error) {
            (Some(quantity), _) => println!("parse {input:?}: ok {quantity}"),
            (None, Some(err)) => println!("parse {input:?}: {err}"),
            (None, None) => unreachable!(),
        }
    }

    // 2. Kinds pin the status at the boundary
    println!();
    for (sku, quantity) in [("SKU-1", 2), ("SKU-9", 1), ("SKU-1", 50)] {
        match reserve(sku, quantity) {
            Outcome::Success(left) => println!("reserve {sku} x{quantity}: {left} left"),
            Outcome::Failure(err) => println!("reserve {sku} x{quantity}: {} {}", err.status(), err.code()),
        }
    }

    // 3. Custom mapping of an unknown fault
    println!();
    let outcome = try_result_sync_with(|| parse_quantity("0"), |fault| {
        ResultError::new(format!("invalid order: {}", inspect(&fault)), 422, "INVALID_ORDER", Some(fault))
    });
    if let Some(err) = outcome.error() {
        println!("mapped: {}", err.to_json());
    }

    // 4. Structured log line for operators
    println!();
    let err = NotFoundError::from(Thrown::error("row 42 missing").with("table", "orders"));
    err.with_internal_log(|log| println!("log: {log}"));
}
