use anyhow::Context;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use colored::Colorize;
use serde_json::json;
use tracing::Level;
use ts_risk::{risk_details, RiskAssessment, RiskEngine, RiskInput, RiskTier};
use ts_server::{ServerConfig, TrustShiftServer};
use ts_token::{parse_key, TokenClaims, TokenCodec};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args, cli.verbose),
        Command::Token(TokenArgs { action: TokenAction::Decode { token, key } }) => {
            init_tracing(cli.verbose, Level::WARN);
            cmd_token_decode(&token, key.as_deref(), format)
        }
        Command::Risk(RiskArgs { action: RiskAction::Score(args) }) => {
            init_tracing(cli.verbose, Level::WARN);
            cmd_risk_score(&args, format)
        }
        Command::Config => cmd_config(format),
    }
}

fn init_tracing(verbose: bool, default: Level) {
    let level = if verbose { Level::DEBUG } else { default };
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn cmd_serve(args: ServeArgs, verbose: bool) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    // Already validated by load().
    let level = config.log_level.parse().unwrap_or(Level::INFO);
    init_tracing(verbose, level);

    let server = TrustShiftServer::new(config)?;
    println!(
        "{} TrustShift on {} (store: {})",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        store_label(server.config()),
    );
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn store_label(config: &ServerConfig) -> String {
    match &config.store {
        ts_server::StoreConfig::Memory => "memory".into(),
        ts_server::StoreConfig::File { path } => format!("file {}", path.display()),
    }
}

fn decode_token(token: &str, key: Option<&str>) -> anyhow::Result<TokenClaims> {
    let codec = match key {
        Some(hex) => TokenCodec::keyed(parse_key(hex)?),
        None => TokenCodec::unkeyed(),
    };
    codec.decode(token).context("token did not decode")
}

fn cmd_token_decode(token: &str, key: Option<&str>, format: OutputFormat) -> anyhow::Result<()> {
    let claims = decode_token(token, key)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&claims)?),
        OutputFormat::Text => {
            let check = if key.is_some() { "tag verified" } else { "tag not checked" };
            println!("{} Token decoded ({})", "✓".green().bold(), check.dimmed());
            println!("  Shift:    {}", claims.shift_id.to_string().yellow());
            println!("  Worker:   {}", claims.worker_id.to_string().cyan());
            println!("  Employer: {}", claims.employer.bold());
            println!("  Start:    {}", claims.start_time.to_rfc3339());
            println!("  Issued:   {}", claims.issued_at.to_rfc3339());
        }
    }
    Ok(())
}

/// Today at `hour:00` UTC.
fn evaluation_time(hour: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    Utc::now().date_naive().and_time(time).and_utc()
}

fn score(args: &ScoreArgs, at: DateTime<Utc>) -> RiskAssessment {
    let mut input = RiskInput::new(at).complaints(args.complaints);
    if let Some(zone) = args.zone.as_deref() {
        input = input.zone(zone);
    }
    if let Some(days) = args.age_days {
        let created = Duration::try_days(days)
            .and_then(|age| at.checked_sub_signed(age))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        input = input.account_created(created);
    }
    RiskEngine::default().assess(&input)
}

fn cmd_risk_score(args: &ScoreArgs, format: OutputFormat) -> anyhow::Result<()> {
    let assessment = score(args, evaluation_time(args.hour));
    let details = risk_details(assessment.score);
    match format {
        OutputFormat::Json => {
            let breakdown: serde_json::Map<_, _> = assessment
                .breakdown
                .iter()
                .map(|f| (f.factor.clone(), json!(f.points)))
                .collect();
            let out = json!({
                "score": details.score,
                "tier": details.tier,
                "message": details.message,
                "breakdown": breakdown,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            let tier = match details.tier {
                RiskTier::Green => details.tier.to_string().green(),
                RiskTier::Yellow => details.tier.to_string().yellow(),
                RiskTier::Red => details.tier.to_string().red(),
            };
            println!("Score {} ({})", details.score.to_string().bold(), tier.bold());
            for factor in &assessment.breakdown {
                println!("  {:<12} {:>3}", factor.factor, factor.points);
            }
            println!("{}", details.message.dimmed());
        }
    }
    Ok(())
}

fn cmd_config(format: OutputFormat) -> anyhow::Result<()> {
    let config = ServerConfig::default();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => print!("{}", config.to_toml()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use ts_types::{ShiftId, UserId};

    fn args(hour: u32, zone: Option<&str>, complaints: u32, age_days: Option<i64>) -> ScoreArgs {
        ScoreArgs {
            hour,
            zone: zone.map(String::from),
            complaints,
            age_days,
        }
    }

    #[test]
    fn late_night_isolated_new_account_is_red() {
        let at = Utc.with_ymd_and_hms(2024, 5, 3, 23, 0, 0).unwrap();
        let assessment = score(&args(23, Some("isolated_area"), 0, Some(2)), at);
        assert_eq!(assessment.score, 65);
        assert_eq!(assessment.tier, RiskTier::Red);
        assert_eq!(assessment.breakdown.len(), 4);
    }

    #[test]
    fn midday_established_account_is_green() {
        let at = Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap();
        let assessment = score(&args(12, Some("mall"), 0, Some(365)), at);
        assert_eq!(assessment.tier, RiskTier::Green);
    }

    #[test]
    fn huge_account_age_scores_as_established() {
        let at = Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap();
        let assessment = score(&args(12, Some("mall"), 0, Some(i64::MAX)), at);
        let age = assessment
            .breakdown
            .iter()
            .find(|f| f.factor == "account_age")
            .unwrap();
        assert_eq!(age.points, 0);
    }

    #[test]
    fn evaluation_time_uses_hour() {
        assert_eq!(evaluation_time(5).hour(), 5);
        assert_eq!(evaluation_time(5).minute(), 0);
    }

    #[test]
    fn decode_unkeyed_and_keyed() {
        let start = Utc.with_ymd_and_hms(2024, 5, 3, 23, 0, 0).unwrap();
        let key = [9u8; 32];
        let shift = ShiftId::new();
        let worker = UserId::new();

        let token = TokenCodec::unkeyed()
            .encode_shift(shift, worker, "CafeX", start, start)
            .unwrap();
        assert_eq!(decode_token(&token, None).unwrap().shift_id, shift);

        let signed = TokenCodec::keyed(key)
            .encode_shift(shift, worker, "CafeX", start, start)
            .unwrap();
        let hex_key = "09".repeat(32);
        assert_eq!(decode_token(&signed, Some(&hex_key)).unwrap().worker_id, worker);
        assert!(decode_token(&token, Some(&hex_key)).is_err());
        assert!(decode_token(&signed, Some("zz")).is_err());
    }
}
