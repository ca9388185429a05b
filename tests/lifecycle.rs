//! End-to-end lifecycle properties of the run harness.

mod support;

use devrun::{run_with_argv, FlagOptions, ProcCommand, RunOptions};
use support::{argv, Probe};

#[tokio::test]
async fn help_short_circuits_without_invoking_callback() {
    let probe = Probe::new();
    let callback_probe = probe.clone();

    let code = run_with_argv(
        argv(&["--help"]),
        move |_context| async move {
            callback_probe.mark_invoked();
            Ok(())
        },
        RunOptions::new().usage("demo [...flags]").description("demo"),
    )
    .await;

    assert_eq!(code, 0);
    assert!(!probe.was_invoked());
}

#[tokio::test]
async fn unexpected_flag_fails_without_invoking_callback() {
    let probe = Probe::new();
    let callback_probe = probe.clone();

    let code = run_with_argv(
        argv(&["--bogus"]),
        move |_context| async move {
            callback_probe.mark_invoked();
            Ok(())
        },
        RunOptions::new(),
    )
    .await;

    assert_ne!(code, 0);
    assert!(!probe.was_invoked());
}

#[tokio::test]
async fn allow_unexpected_permits_unknown_flags() {
    let probe = Probe::new();
    let callback_probe = probe.clone();

    let code = run_with_argv(
        argv(&["--bogus"]),
        move |context| async move {
            callback_probe.mark_invoked();
            assert_eq!(context.flags().unexpected(), ["bogus"]);
            Ok(())
        },
        RunOptions::new().flags(FlagOptions::new().allow_unexpected(true)),
    )
    .await;

    assert_eq!(code, 0);
    assert!(probe.was_invoked());
}

#[tokio::test]
async fn cleanup_tasks_run_in_order_after_callback() {
    let probe = Probe::new();
    let callback_probe = probe.clone();

    let code = run_with_argv(
        Vec::new(),
        move |context| async move {
            context.add_cleanup_task(callback_probe.recorder("first"));
            context.add_cleanup_task(callback_probe.recorder("second"));
            callback_probe.record("body");
            Ok(())
        },
        RunOptions::new(),
    )
    .await;

    assert_eq!(code, 0);
    assert_eq!(probe.events(), ["body", "first", "second"]);
}

#[tokio::test]
async fn callback_error_yields_nonzero_and_cleanup_still_runs() {
    let probe = Probe::new();
    let callback_probe = probe.clone();

    let code = run_with_argv(
        Vec::new(),
        move |context| async move {
            context.add_cleanup_task(callback_probe.recorder("cleanup"));
            anyhow::bail!("callback blew up");
        },
        RunOptions::new(),
    )
    .await;

    assert_eq!(code, 1);
    assert_eq!(probe.events(), ["cleanup"]);
}

#[tokio::test]
async fn caller_alias_wins_over_builtin_inside_context() {
    let probe = Probe::new();
    let callback_probe = probe.clone();

    let options = RunOptions::new().flags(
        FlagOptions::new()
            .string("vivid")
            .alias("v", "vivid"),
    );

    let code = run_with_argv(
        argv(&["-v", "teal"]),
        move |context| async move {
            callback_probe.mark_invoked();
            assert_eq!(context.flags_reader().resolve("v"), "vivid");
            assert_eq!(context.flags_reader().string("vivid")?, Some("teal"));
            Ok(())
        },
        options,
    )
    .await;

    assert_eq!(code, 0);
    assert!(probe.was_invoked());
}

#[tokio::test]
async fn context_exposes_flags_meta_and_positionals() {
    let probe = Probe::new();
    let callback_probe = probe.clone();

    let options = RunOptions::new().flags(FlagOptions::new().string("from"));
    let code = run_with_argv(
        argv(&["--from=here", "extra", "args"]),
        move |context| async move {
            callback_probe.mark_invoked();
            assert_eq!(context.flags().positional(), ["extra", "args"]);
            assert_eq!(context.flags_reader().required_string("from")?, "here");
            assert_eq!(context.stats_meta().pid(), std::process::id());
            Ok(())
        },
        options,
    )
    .await;

    assert_eq!(code, 0);
    assert!(probe.was_invoked());
}

#[tokio::test]
async fn failing_supervised_child_fails_the_run() {
    let code = run_with_argv(
        Vec::new(),
        |context| async move {
            context
                .proc_runner()
                .run("boom", ProcCommand::new("sh").arg("-c").arg("exit 3"))
                .await
        },
        RunOptions::new(),
    )
    .await;

    assert_eq!(code, 1);
}
