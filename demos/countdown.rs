//! Counts down from `--from` and hands the liftoff to a supervised child
//! process. Run with: `cargo run --example countdown -- --from 3 -v`

use devrun::{run, FlagOptions, FlagValue, ProcCommand, RunOptions};
use std::time::Duration;

#[tokio::main]
async fn main() {
    let options = RunOptions::new()
        .usage("countdown [...options]")
        .description("Counts down and echoes liftoff through a supervised child process")
        .flags(
            FlagOptions::new()
                .string("from")
                .default_value("from", FlagValue::String("3".to_string()))
                .help("--from             Number to count down from (default 3)")
                .examples("countdown --from 5 --verbose"),
        );

    run(
        |context| async move {
            let from = context.flags_reader().required_number("from")?;
            context.add_cleanup_task(Box::new(|| tracing::info!("countdown finished")));

            for remaining in (1..=from).rev() {
                tracing::info!(remaining, "tick");
                tokio::time::sleep(Duration::from_millis(250)).await;
            }

            context
                .proc_runner()
                .run("liftoff", ProcCommand::new("echo").arg("liftoff!"))
                .await
        },
        options,
    )
    .await
}
