//! Runs a short Colorama script against an in-memory host
//!
//! ```text
//! cargo run -p pymol-colorama --bin colorama-demo [-- "<commands>"]
//! ```

use std::process::ExitCode;

use env_logger::Env;
use pymol_colorama::{CommandExecutor, HostCall, MemoryHost};

const DEFAULT_SCRIPT: &str = "\
# open the editor on the chain, then color it by residue number
colorama prot
color_grad prot, gradient=bwr
color_grad prot, item=q, mode=ramp, nbins=3, gradient=gw
";

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let script = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_SCRIPT.to_string());

    let mut host = MemoryHost::new();
    if let Err(e) = host.add_chain("prot", 1..=10, "green") {
        log::error!("could not build the demo molecule: {}", e);
        return ExitCode::FAILURE;
    }

    let mut executor = CommandExecutor::new();
    let status = match executor.do_multi(&mut host, &script) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    };

    for call in host.calls() {
        if let HostCall::Apply(name, selection) = call {
            let hex = host
                .colors()
                .get_by_name(name)
                .map(|(_, color)| color.to_rgb8().to_hex())
                .unwrap_or_default();
            println!("{:<24} {}  {}", name, hex, selection);
        }
    }

    if let Some(tool) = executor.close_tool() {
        println!("tool state: {:?}", tool.state());
    }
    status
}
