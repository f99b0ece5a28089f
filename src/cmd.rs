use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use evoshare::{codec, Dealer, Error, SecretSharing, Share, M127, M521};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split a secret text into N shares, any K of which recover it
    Split(SplitArgs),
    /// Issue shares one participant at a time, without fixing N in advance
    Evolve(EvolveArgs),
    /// Recover a secret text from shares, one `(x, y)` per line
    Recover(RecoverArgs),
}

/// Prime field the shares live in.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Field {
    /// 2^127 - 1, texts up to 15 bytes
    M127,
    /// 2^521 - 1, texts up to 65 bytes
    M521,
}

// ---------------------------------------------------------------------------
// Shared arg groups
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct SecretArgs {
    /// Secret text (read from the first line of stdin if omitted)
    #[arg(long)]
    pub secret: Option<String>,

    /// Field to split over; recovery must use the same one
    #[arg(long, value_enum, default_value_t = Field::M127)]
    pub field: Field,
}

// ---------------------------------------------------------------------------
// Per-command args
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct SplitArgs {
    #[command(flatten)]
    pub secret: SecretArgs,

    /// Threshold K, the minimum shares required to recover the secret
    #[arg(short = 'k', long)]
    pub threshold: usize,

    /// Total number of shares N to create
    #[arg(short = 'n', long)]
    pub num_shares: u64,
}

#[derive(Args, Debug)]
pub struct EvolveArgs {
    #[command(flatten)]
    pub secret: SecretArgs,

    /// Threshold K, the minimum shares required to recover the secret
    #[arg(short = 'k', long)]
    pub threshold: usize,
}

#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// File with one share per line (defaults to stdin)
    #[arg(long, value_name = "FILE")]
    pub r#in: Option<PathBuf>,

    /// Field the shares were created over
    #[arg(long, value_enum, default_value_t = Field::M127)]
    pub field: Field,

    /// Expected threshold K, only used to warn when fewer shares are supplied
    #[arg(short = 'k', long)]
    pub threshold: Option<usize>,
}

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Split(args) => match args.secret.field {
            Field::M127 => split::<M127>(args),
            Field::M521 => split::<M521>(args),
        },
        Command::Evolve(args) => match args.secret.field {
            Field::M127 => evolve::<M127>(args),
            Field::M521 => evolve::<M521>(args),
        },
        Command::Recover(args) => match args.field {
            Field::M127 => recover::<M127>(args),
            Field::M521 => recover::<M521>(args),
        },
    }
}

fn split<const EXP: u32>(args: SplitArgs) -> Result<()> {
    let sss = SecretSharing::<EXP>::new(args.threshold)?;
    let secret = read_secret::<EXP>(&args.secret)?;

    let started = Instant::now();
    let shares = sss.split(&secret, args.num_shares)?;
    eprintln!(
        "split: generated {}-of-{} shares over 2^{} - 1 in {:?}",
        args.threshold,
        args.num_shares,
        EXP,
        started.elapsed()
    );

    let mut out = io::stdout().lock();
    for share in &shares {
        writeln!(out, "{share}").context("write stdout")?;
    }
    out.flush().context("flush stdout")
}

fn evolve<const EXP: u32>(args: EvolveArgs) -> Result<()> {
    let sss = SecretSharing::<EXP>::new(args.threshold)?;
    let secret = read_secret::<EXP>(&args.secret)?;
    let dealer = sss.dealer(&secret)?;

    issue_shares(
        dealer,
        &mut io::stdin().lock(),
        &mut io::stdout(),
        &mut io::stderr(),
    )
}

/// Runs an evolving session: one share per round, asking on `input` whether to go on.
///
/// End of input stops issuance; it never counts as permission to issue another share.
/// Shares go to `out`, prompts and warnings to `status`.
fn issue_shares<R: BufRead, W: Write, E: Write>(
    mut dealer: Dealer,
    input: &mut R,
    out: &mut W,
    status: &mut E,
) -> Result<()> {
    let mut total = Duration::ZERO;
    let mut warned = false;

    loop {
        let started = Instant::now();
        let Some(share) = dealer.issue_next() else {
            writeln!(status, "evolve: every identifier of the field is taken")?;
            break;
        };
        total += started.elapsed();

        writeln!(status, "evolve: welcome, participant {}", share.x)?;
        writeln!(out, "{share}").context("write shares")?;
        out.flush().context("flush shares")?;

        match prompt_yes(input, status, "evolve: issue another share? [y/N] ")? {
            Some(true) => continue,
            Some(false) => {}
            None => {
                writeln!(status)?;
                break;
            }
        }
        if dealer.is_recoverable() {
            break;
        }
        writeln!(
            status,
            "evolve: warning: only {} of the {} shares needed were issued, stopping now loses the secret",
            dealer.issued(),
            dealer.threshold()
        )?;
        warned = true;
        match prompt_yes(input, status, "evolve: stop anyway? [y/N] ")? {
            Some(false) => continue,
            Some(true) => break,
            None => {
                writeln!(status)?;
                break;
            }
        }
    }

    writeln!(status, "evolve: issued {} share(s) in {:?}", dealer.issued(), total)?;
    match dealer.finish() {
        Ok(_) => Ok(()),
        Err(Error::Unrecoverable { .. }) if warned => Ok(()),
        Err(err @ Error::Unrecoverable { .. }) => {
            writeln!(status, "evolve: warning: {err}")?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn recover<const EXP: u32>(args: RecoverArgs) -> Result<()> {
    let text = match &args.r#in {
        Some(path) => recover_text::<EXP, _, _>(
            BufReader::new(File::open(path).with_context(|| format!("open {:?}", path))?),
            args.threshold,
            &mut io::stderr(),
        )?,
        None => recover_text::<EXP, _, _>(io::stdin().lock(), args.threshold, &mut io::stderr())?,
    };
    println!("{text}");
    Ok(())
}

/// Reads one share per line from `input` and decodes the recovered value as text.
fn recover_text<const EXP: u32, R: BufRead, E: Write>(
    input: R,
    threshold: Option<usize>,
    status: &mut E,
) -> Result<String> {
    let mut shares: Vec<Share> = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line.context("read shares")?;
        if line.trim().is_empty() {
            continue;
        }
        let share = line
            .parse::<Share>()
            .with_context(|| format!("line {}", i + 1))?;
        shares.push(share);
    }
    writeln!(status, "recover: read {} share(s)", shares.len())?;

    let threshold = threshold.unwrap_or(2);
    if shares.len() < threshold {
        writeln!(
            status,
            "recover: warning: {} share(s) supplied but {} are needed, the result will be garbage",
            shares.len(),
            threshold
        )?;
    }

    let sss = SecretSharing::<EXP>::new(threshold)?;
    let value = sss.recover(&shares)?;

    // Decoding failure is the only hint of too few or mismatched shares; valid-looking
    // text is no proof of the opposite.
    match codec::decode(&value) {
        Ok(text) => Ok(text),
        Err(Error::Decoding) => {
            bail!("recovered value is not text: not enough shares, or shares of another secret")
        }
        Err(err) => Err(err.into()),
    }
}

/// Secret from `--secret` or the first line of stdin, encoded into the field.
fn read_secret<const EXP: u32>(args: &SecretArgs) -> Result<num_bigint::BigUint> {
    let text = match &args.secret {
        Some(text) => text.clone(),
        None => {
            eprint!("enter the secret: ");
            io::stderr().flush().context("flush stderr")?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).context("read stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    codec::encode(&text, EXP).with_context(|| {
        format!(
            "encode secret (texts up to {} bytes always fit 2^{} - 1)",
            codec::max_text_len(EXP),
            EXP
        )
    })
}

/// `None` when `input` is exhausted.
fn prompt_yes<R: BufRead, E: Write>(
    input: &mut R,
    status: &mut E,
    question: &str,
) -> Result<Option<bool>> {
    write!(status, "{question}")?;
    status.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer).context("read answer")? == 0 {
        return Ok(None);
    }
    Ok(Some(answer.trim().eq_ignore_ascii_case("y")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    fn open(threshold: usize) -> Dealer {
        let sss = SecretSharing::<M127>::new(threshold).unwrap();
        let secret = codec::encode("ciao", M127).unwrap();
        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        sss.dealer_rng(&secret, &mut rng).unwrap()
    }

    /// Runs a session against scripted answers, returning (shares written, status text).
    fn session(threshold: usize, answers: &str) -> (Vec<Share>, String) {
        let mut out = Vec::new();
        let mut status = Vec::new();
        issue_shares(
            open(threshold),
            &mut answers.as_bytes(),
            &mut out,
            &mut status,
        )
        .unwrap();

        let shares = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| line.parse().unwrap())
            .collect();
        (shares, String::from_utf8(status).unwrap())
    }

    #[test]
    fn confirmed_early_stop_warns_once() {
        let (shares, status) = session(3, "y\nn\ny\n");
        assert_eq!(shares.len(), 2);
        assert_eq!(status.matches("warning").count(), 1);
        assert!(status.contains("only 2 of the 3 shares needed were issued"));
    }

    #[test]
    fn declining_to_stop_keeps_issuing() {
        let (shares, status) = session(3, "n\nn\nn\nn\n");
        assert_eq!(shares.len(), 3);
        assert_eq!(status.matches("warning").count(), 2);
        assert!(status.contains("issued 3 share(s)"));
    }

    #[test]
    fn end_of_input_stops_issuance() {
        let (shares, status) = session(3, "");
        assert_eq!(shares.len(), 1);
        assert!(!status.contains("participant 2"));
        assert_eq!(status.matches("warning").count(), 1);
        assert!(status.contains("only 1 of the 3 shares needed were issued"));
    }

    #[test]
    fn end_of_input_at_confirmation_stops_issuance() {
        let (shares, status) = session(3, "n\n");
        assert_eq!(shares.len(), 1);
        assert!(!status.contains("participant 2"));
        assert_eq!(status.matches("warning").count(), 1);
    }

    #[test]
    fn reaching_threshold_needs_no_warning() {
        let (shares, status) = session(2, "y\nn\n");
        assert_eq!(shares.len(), 2);
        assert!(!status.contains("warning"));
    }

    fn split_lines(threshold: usize, n: u64) -> Vec<String> {
        let sss = SecretSharing::<M521>::new(threshold).unwrap();
        let secret = codec::encode("a secret worth sharing", M521).unwrap();
        let mut rng = ChaCha8Rng::from_seed([11; 32]);
        sss.split_rng(&secret, n, &mut rng)
            .unwrap()
            .iter()
            .map(Share::to_string)
            .collect()
    }

    #[test]
    fn recover_text_from_threshold_shares() {
        let lines = split_lines(3, 5);
        let input = format!("{}\n\n{}\n{}\n", lines[4], lines[0], lines[2]);
        let mut status = Vec::new();

        let text = recover_text::<M521, _, _>(input.as_bytes(), Some(3), &mut status).unwrap();
        assert_eq!(text, "a secret worth sharing");
        assert!(String::from_utf8(status).unwrap().contains("read 3 share(s)"));
    }

    #[test]
    fn recover_text_below_threshold_is_not_text() {
        let lines = split_lines(3, 3);
        let input = format!("{}\n{}\n", lines[0], lines[1]);
        let mut status = Vec::new();

        let err = recover_text::<M521, _, _>(input.as_bytes(), Some(3), &mut status).unwrap_err();
        assert!(err.to_string().contains("not text"));
        assert!(String::from_utf8(status)
            .unwrap()
            .contains("2 share(s) supplied but 3 are needed"));
    }

    #[test]
    fn recover_text_reports_the_bad_line() {
        let input = "(1, 2)\nnot a share\n";
        let err = recover_text::<M127, _, _>(input.as_bytes(), None, &mut io::sink()).unwrap_err();
        assert_eq!(err.to_string(), "line 2");
    }
}
