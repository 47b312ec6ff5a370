#![no_main]

use libfuzzer_sys::fuzz_target;
use safe_result::{InspectOptions, Thrown, inspect, inspect_with};

/// Build a graph from raw bytes. Each opcode creates a node or links two
/// existing ones, so arbitrary cycles and shared children are reachable.
fn build(data: &[u8]) -> Thrown {
    let mut nodes: Vec<Thrown> = vec![Thrown::object()];
    let mut bytes = data.iter().copied();

    while let Some(op) = bytes.next() {
        let arg = bytes.next().unwrap_or(0);
        let pick = |nodes: &Vec<Thrown>, i: u8| nodes[usize::from(i) % nodes.len()].clone();
        match op % 12 {
            0 => nodes.push(Thrown::from(f64::from(arg) / 3.0)),
            1 => nodes.push(Thrown::from(String::from_utf8_lossy(&[arg, arg]).into_owned())),
            2 => nodes.push(Thrown::array([pick(&nodes, arg)])),
            3 => nodes.push(Thrown::object().with(format!("k{arg}"), pick(&nodes, arg))),
            4 => nodes.push(Thrown::error("fuzz").with_cause(pick(&nodes, arg))),
            5 => nodes.push(Thrown::map([(pick(&nodes, arg), pick(&nodes, arg.wrapping_add(1)))])),
            6 => nodes.push(Thrown::set([pick(&nodes, arg), Thrown::from(f64::NAN)])),
            7 => nodes.push(Thrown::buffer(vec![arg; usize::from(arg)])),
            8 => {
                let target = pick(&nodes, arg);
                target.assign(format!("p{arg}"), pick(&nodes, arg.wrapping_mul(7)));
                target.push(pick(&nodes, arg.wrapping_add(3)));
            }
            9 => {
                let target = pick(&nodes, arg);
                let other = pick(&nodes, arg.wrapping_add(5));
                if arg % 2 == 0 {
                    target.assign_getter("g", move || Ok(other.clone()));
                } else {
                    target.assign_getter("g", || Err(Thrown::error("getter failed")));
                }
            }
            10 => nodes.push(Thrown::big_int(i128::from(arg) << 100)),
            _ => pick(&nodes, arg).set_cause(pick(&nodes, arg.wrapping_sub(1))),
        }
    }

    nodes.swap_remove(0)
}

fuzz_target!(|data: &[u8]| {
    let root = build(data);
    let _ = inspect(&root);
    let shallow = InspectOptions::new().with_max_depth(4).with_buffer_preview(2);
    let _ = inspect_with(&root, &shallow);
});
