//! End-to-end command tests against the in-memory host

use pymol_color::{ColorMode, Rgb8};
use pymol_colorama::{
    CmdError, CommandExecutor, HostCall, MemoryHost, PaintMode, SessionState, Slot,
};

fn setup() -> (CommandExecutor, MemoryHost) {
    let mut host = MemoryHost::new();
    host.add_chain("prot", 1..=10, "green").unwrap();
    host.add_chain("twotone", 1..=5, "red").unwrap();
    host.paint("twotone and resi = 5", "blue").unwrap();
    (CommandExecutor::new().with_quiet(true), host)
}

fn applied(host: &MemoryHost) -> Vec<(String, String)> {
    host.calls()
        .iter()
        .filter_map(|call| match call {
            HostCall::Apply(name, selection) => Some((name.clone(), selection.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_default_gradient_bins_every_residue() {
    let (mut executor, mut host) = setup();
    executor
        .do_(&mut host, "color_grad prot, minimum=1, maximum=10")
        .unwrap();

    let applied = applied(&host);
    assert_eq!(applied.len(), 11);
    for (j, (name, selection)) in applied.iter().enumerate() {
        assert_eq!(name, &format!("color_prot{}", j));
        assert_eq!(selection, &format!("prot and resi = {}", j + 1));
    }

    // bgr: residue 1 blue, the padding bin after residue 10 red
    assert_eq!(host.color_of("prot and resi = 1").unwrap().to_rgb8(), Rgb8::new(0, 0, 255));
    let (_, last) = host.colors().get_by_name("color_prot10").unwrap();
    assert_eq!(last.to_rgb8(), Rgb8::new(255, 0, 0));
}

#[test]
fn test_single_bin_request_uses_eleven() {
    let (mut executor, mut host) = setup();
    executor.do_(&mut host, "color_grad prot, nbins=1").unwrap();
    assert_eq!(applied(&host).len(), 11);
}

#[test]
fn test_unknown_gradient_colors_nothing() {
    let (mut executor, mut host) = setup();
    let err = executor
        .do_(&mut host, "color_grad prot, gradient=xyz")
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.to_string(), "unknown gradient: xyz, nothing done");
    assert_eq!(host.apply_count(), 0);
    assert!(host.calls().is_empty());
}

#[test]
fn test_bad_bin_counts_color_nothing() {
    let (mut executor, mut host) = setup();
    assert!(matches!(
        executor.do_(&mut host, "color_grad prot, nbins=0"),
        Err(CmdError::Validation(_))
    ));
    assert!(matches!(
        executor.do_(&mut host, "color_grad prot, minimum=10, maximum=1"),
        Err(CmdError::Validation(_))
    ));
    assert_eq!(host.apply_count(), 0);
}

#[test]
fn test_extreme_bounds_are_rejected() {
    let (mut executor, mut host) = setup();
    for cmd in [
        "color_grad prot, minimum=-9000000000000000000, maximum=9000000000000000000",
        "color_grad prot, minimum=-9223372036854775808, maximum=0",
        "color_grad prot, minimum=0, maximum=9223372036854775807",
        "color_grad prot, minimum=0, maximum=10000000000",
        "color_grad prot, nbins=100000000",
        "color_grad prot, nbins=9223372036854775807",
    ] {
        assert!(
            matches!(executor.do_(&mut host, cmd), Err(CmdError::Validation(_))),
            "{} was accepted",
            cmd
        );
    }
    assert_eq!(host.apply_count(), 0);
}

#[test]
fn test_missing_selection_is_a_usage_error() {
    let (mut executor, mut host) = setup();
    assert!(matches!(
        executor.do_(&mut host, "color_grad"),
        Err(CmdError::MissingArgument(_))
    ));
}

#[test]
fn test_colorama_opens_once() {
    let (mut executor, mut host) = setup();
    assert!(executor.tool().is_none());

    executor.do_(&mut host, "colorama").unwrap();
    assert_eq!(executor.tool().unwrap().state(), &SessionState::NoSelection);

    executor.do_(&mut host, "colorama mode=hsv").unwrap();
    executor.do_(&mut host, "colorama").unwrap();
    assert_eq!(executor.tool().unwrap().color_mode(), ColorMode::Hsv);
}

#[test]
fn test_activation_picks_paint_mode() {
    let (mut executor, mut host) = setup();

    executor.do_(&mut host, "colorama prot").unwrap();
    assert_eq!(executor.tool().unwrap().paint_mode(), Some(PaintMode::Mono));

    executor.do_(&mut host, "colorama twotone").unwrap();
    let tool = executor.tool().unwrap();
    assert_eq!(tool.paint_mode(), Some(PaintMode::Gradient));
    assert_eq!(tool.slot_hex(Slot::Start), "#ff0000");
    assert_eq!(tool.slot_hex(Slot::End), "#0000ff");
}

#[test]
fn test_editing_through_the_open_tool() {
    let (mut executor, mut host) = setup();
    executor.do_(&mut host, "colorama prot").unwrap();

    let tool = executor.tool_mut().unwrap();
    tool.on_color_changed(&mut host, [255.0, 128.0, 0.0]).unwrap();
    tool.on_color_changed(&mut host, [10.0, 20.0, 30.0]).unwrap();

    let removes = host
        .calls()
        .iter()
        .filter(|c| matches!(c, HostCall::Remove(name) if name == "prot_color"))
        .count();
    assert_eq!(removes, 2);
    assert_eq!(host.color_of("prot and resi = 7").unwrap().to_rgb8(), Rgb8::new(10, 20, 30));
}

#[test]
fn test_script_stops_at_first_failure() {
    let (mut executor, mut host) = setup();
    let result = executor.do_multi(
        &mut host,
        "colorama prot\ncolor_grad prot, mode=spline\ncolor_grad prot",
    );
    assert!(result.is_err());
    assert!(executor.tool().is_some());
    assert_eq!(host.apply_count(), 0);
}
