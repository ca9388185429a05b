use crate::runtime::options::RunOptions;

const DEFAULT_USAGE: &str = "<command> [...options]";

/// Renders the help text shown for `--help` and after flag-format errors.
pub fn get_help(options: &RunOptions) -> String {
    let mut help = String::new();

    help.push('\n');
    help.push_str(&format!(
        "  Usage: {}\n",
        options.usage.as_deref().unwrap_or(DEFAULT_USAGE)
    ));

    if let Some(description) = &options.description {
        help.push('\n');
        push_block(&mut help, description, "  ");
    }

    help.push_str("\n  Options:\n");
    if let Some(flag_help) = &options.flags.help {
        push_block(&mut help, flag_help, "    ");
    }
    help.push_str("    --verbose, -v      Log verbosely\n");
    help.push_str("    --debug            Log debug messages (less than verbose)\n");
    help.push_str("    --quiet            Only log errors\n");
    help.push_str("    --silent           Don't log anything\n");
    help.push_str("    --help             Show this message\n");

    if let Some(level) = options.log.default_level {
        help.push_str(&format!("\n  Default log level: {}\n", level.name()));
    }

    if let Some(examples) = &options.flags.examples {
        help.push_str("\n  Examples:\n");
        push_block(&mut help, examples, "    ");
    }

    help
}

fn push_block(out: &mut String, text: &str, indent: &str) {
    for line in text.trim_end().lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(indent);
            out.push_str(line);
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::schema::FlagOptions;
    use crate::log::LogLevel;

    #[test]
    fn includes_usage_and_description() {
        let options = RunOptions::new()
            .usage("demo [...flags]")
            .description("Does a demo thing");
        let help = get_help(&options);
        assert!(help.contains("Usage: demo [...flags]"));
        assert!(help.contains("Does a demo thing"));
    }

    #[test]
    fn falls_back_to_placeholder_usage() {
        let help = get_help(&RunOptions::new());
        assert!(help.contains(DEFAULT_USAGE));
    }

    #[test]
    fn documents_builtin_flags_and_extras() {
        let options = RunOptions::new().flags(
            FlagOptions::new()
                .help("--from  Where the countdown starts")
                .examples("demo --from 5"),
        );
        let help = get_help(&options);
        assert!(help.contains("--verbose, -v"));
        assert!(help.contains("--help"));
        assert!(help.contains("--from  Where the countdown starts"));
        assert!(help.contains("demo --from 5"));
    }

    #[test]
    fn annotates_configured_default_level() {
        let options = RunOptions::new().default_log_level(LogLevel::Debug);
        assert!(get_help(&options).contains("Default log level: debug"));
    }
}
