use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Printed on every validation failure before exiting.
pub const USAGE: &str = "
etcd-announcer -service SERVICE

Other arguments:
-type <net|msg> (default: msg)
-if INTERFACE_NAME (must be set when -type net)
-msg MESSAGE (must be set when -type msg)
-ttl <TTL in seconds> (default: 30s)
-path ETCD_PATH (default: /service)
-etcd ETCD_PEER (default: http://127.0.0.1:4001)
-config FILE (TOML file with an [announce] table)
";

/// Long flags that may also be written with a single dash (`-service riak`).
const LONG_FLAGS: &[&str] = &["service", "etcd", "path", "ttl", "type", "msg", "if", "config"];

/// Flags left unset fall back to the config file, then to built-in defaults.
#[derive(Parser, Debug, Default)]
#[command(
    name = "etcd-announcer",
    version,
    about = "Announce a service in etcd with a self-expiring key"
)]
pub struct Cli {
    /// Service name to announce
    #[arg(long, allow_hyphen_values = true)]
    pub service: Option<String>,

    /// etcd peer address (default: http://127.0.0.1:4001)
    #[arg(long, allow_hyphen_values = true)]
    pub etcd: Option<String>,

    /// Path in etcd to place announcement in (default: /service)
    #[arg(long, allow_hyphen_values = true)]
    pub path: Option<String>,

    /// Service announce TTL in seconds (default: 30)
    #[arg(long)]
    pub ttl: Option<u64>,

    /// Announce type. One of "net" or "msg" (default: msg)
    #[arg(long = "type", value_name = "TYPE", allow_hyphen_values = true)]
    pub announce_type: Option<String>,

    /// Message to announce
    #[arg(long, allow_hyphen_values = true)]
    pub msg: Option<String>,

    /// Interface to announce
    #[arg(long = "if", value_name = "INTERFACE", allow_hyphen_values = true)]
    pub interface: Option<String>,

    /// TOML config file supplying defaults for the flags above
    #[arg(long, value_name = "FILE", allow_hyphen_values = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse arguments, accepting Go-style single-dash long flags.
    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// tracing filter directive matching the requested verbosity
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "etcd_announcer=info",
            1 => "etcd_announcer=debug",
            _ => "etcd_announcer=trace",
        }
    }
}

/// Rewrite `-service` / `-ttl=10` into `--service` / `--ttl=10`.
/// The token following a value-taking flag is its value and is never
/// rewritten, so `-msg -service` announces "-service". Anything after a bare
/// `--` is left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    let mut value_next = false;

    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if value_next {
                value_next = false;
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }

            let (dashes, rest) = match text.strip_prefix("--") {
                Some(rest) => (2, rest),
                None => match text.strip_prefix('-') {
                    Some(rest) => (1, rest),
                    None => return arg,
                },
            };
            let (name, inline_value) = match rest.split_once('=') {
                Some((name, _)) => (name, true),
                None => (rest, false),
            };
            if !LONG_FLAGS.contains(&name) {
                return arg;
            }

            value_next = !inline_value;
            if dashes == 1 {
                OsString::from(format!("--{}", rest))
            } else {
                arg
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_single_dash_flags() {
        let args = normalize_args(["etcd-announcer", "-service", "riak", "-ttl=10", "-v", "--msg", "foo"]);

        assert_eq!(
            args,
            vec!["etcd-announcer", "--service", "riak", "--ttl=10", "-v", "--msg", "foo"]
                .into_iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_normalize_leaves_values_alone() {
        let args = normalize_args(["etcd-announcer", "-msg", "-x", "--", "-service"]);

        assert_eq!(args[1], OsString::from("--msg"));
        assert_eq!(args[2], OsString::from("-x"));
        assert_eq!(args[4], OsString::from("-service"));
    }

    #[test]
    fn test_parse_original_examples() {
        let cli = Cli::try_parse_normalized(["etcd-announcer", "-service", "riak", "-msg", "foo"]).unwrap();
        assert_eq!(cli.service.as_deref(), Some("riak"));
        assert_eq!(cli.msg.as_deref(), Some("foo"));
        assert_eq!(cli.announce_type, None);
        assert_eq!(cli.ttl, None);

        let cli = Cli::try_parse_normalized([
            "etcd-announcer",
            "-path",
            "/service/riak",
            "-service",
            "riak-1",
            "-type",
            "net",
            "-if",
            "eth0",
        ])
        .unwrap();
        assert_eq!(cli.path.as_deref(), Some("/service/riak"));
        assert_eq!(cli.announce_type.as_deref(), Some("net"));
        assert_eq!(cli.interface.as_deref(), Some("eth0"));
    }

    #[test]
    fn test_normalize_skips_flag_values() {
        let args = normalize_args(["etcd-announcer", "-msg", "-service", "-path", "-ttl", "-if", "eth0", "-ttl=5", "-type"]);

        assert_eq!(
            args,
            vec!["etcd-announcer", "--msg", "-service", "--path", "-ttl", "--if", "eth0", "--ttl=5", "--type"]
                .into_iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_parse_hyphen_values() {
        let cli = Cli::try_parse_normalized(["etcd-announcer", "-service", "riak", "-msg", "-x"]).unwrap();
        assert_eq!(cli.service.as_deref(), Some("riak"));
        assert_eq!(cli.msg.as_deref(), Some("-x"));

        let cli = Cli::try_parse_normalized(["etcd-announcer", "-service", "riak", "-msg", "-service"]).unwrap();
        assert_eq!(cli.service.as_deref(), Some("riak"));
        assert_eq!(cli.msg.as_deref(), Some("-service"));

        let cli = Cli::try_parse_normalized(["etcd-announcer", "-msg", "--ttl", "-service", "riak"]).unwrap();
        assert_eq!(cli.msg.as_deref(), Some("--ttl"));
        assert_eq!(cli.service.as_deref(), Some("riak"));
        assert_eq!(cli.ttl, None);
    }

    #[test]
    fn test_parse_rejects_non_numeric_ttl() {
        let result = Cli::try_parse_normalized(["etcd-announcer", "-service", "riak", "-ttl", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::try_parse_normalized(["etcd-announcer", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_directive(), "etcd_announcer=trace");
        assert_eq!(Cli::default().log_directive(), "etcd_announcer=info");
    }
}
