use clap::{Parser, ValueEnum};

/// Step-by-step algorithm walkthroughs in the terminal.
///
/// Plays one algorithm run, printing a frame per step. With `--interactive`,
/// the keyboard controls playback: space pauses/resumes (or restarts a reset
/// run), `r` resets, `+`/`-` change speed, `q` quits.
#[derive(Parser, Debug)]
#[command(name = "algoviz", version, about)]
pub struct CliArgs {
    /// Algorithm to visualize.
    #[arg(value_enum)]
    pub algorithm: Algorithm,

    /// Input values, comma or space separated (e.g. "5,3,8,1").
    #[arg(long, short, allow_hyphen_values = true, default_value = "")]
    pub input: String,

    /// Target sum (two-sum only).
    #[arg(long, short, allow_hyphen_values = true)]
    pub target: Option<i64>,

    /// Delay per step in milliseconds (overrides ALGOVIZ_SPEED_MS).
    #[arg(long, short)]
    pub speed: Option<u64>,

    /// Polling resolution ceiling in milliseconds (overrides ALGOVIZ_RESOLUTION_MS).
    #[arg(long)]
    pub resolution: Option<u64>,

    /// Frame output format.
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Control playback from the keyboard.
    #[arg(long)]
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Bubble sort with compare/swap highlighting.
    Bubble,
    /// Next greater element with a monotonic stack.
    Nge,
    /// Two-sum with a complement hash map.
    TwoSum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per frame.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_sum_args() {
        let args = CliArgs::try_parse_from([
            "algoviz", "two-sum", "--input", "2,7,11,15", "--target", "9", "--speed", "120",
        ])
        .unwrap();
        assert_eq!(args.algorithm, Algorithm::TwoSum);
        assert_eq!(args.input, "2,7,11,15");
        assert_eq!(args.target, Some(9));
        assert_eq!(args.speed, Some(120));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.interactive);
    }

    #[test]
    fn accepts_negative_values() {
        let args = CliArgs::try_parse_from([
            "algoviz", "bubble", "--input", "-3,1", "--format", "json",
        ])
        .unwrap();
        assert_eq!(args.input, "-3,1");
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn rejects_unknown_algorithm() {
        assert!(CliArgs::try_parse_from(["algoviz", "quicksort"]).is_err());
    }
}
