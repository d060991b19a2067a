use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::HashSet;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tagboard_server::hashtag::{extract_hashtags, normalize_tag, TagLinker, DEFAULT_HREF_BASE};

/// Tagboard hashtag tools
///
/// Normalize, extract and linkify hashtags outside the server, or scan a file
/// of post bodies to backfill their tag keys.
#[derive(Parser, Debug)]
#[command(name = "tagboard")]
#[command(about = "Hashtag extraction and linkification tools", long_about = None)]
struct Args {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical key of a tag
    Normalize {
        /// Tag text, with or without the leading #
        tag: String,
    },
    /// Print the distinct hashtags of a text as JSON
    Extract {
        /// Text to scan (reads stdin when omitted)
        text: Option<String>,
    },
    /// Print a text split into plain segments and tag links as JSON
    Linkify {
        /// Text to linkify (reads stdin when omitted)
        text: Option<String>,

        /// Path prefix of tag pages
        #[arg(long, env = "TAGBOARD_HREF_BASE", default_value = DEFAULT_HREF_BASE)]
        href_base: String,
    },
    /// Treat each non-empty line of a file as a post and print its tag keys
    Scan {
        /// File with one post body per line
        file: PathBuf,

        /// Show progress every N posts
        #[arg(short, long, default_value = "100")]
        progress_interval: usize,
    },
}

/// Statistics collected while scanning posts
#[derive(Debug, Default, PartialEq, Eq)]
struct ScanStats {
    /// Total number of posts scanned
    posts_scanned: usize,
    /// Number of posts that had hashtags
    posts_with_hashtags: usize,
    /// Tags found, counted once per post
    total_hashtags: usize,
    /// Distinct keys across all posts
    unique_hashtags: usize,
}

impl ScanStats {
    fn record_post(&mut self, hashtag_count: usize) {
        self.posts_scanned += 1;
        if hashtag_count > 0 {
            self.posts_with_hashtags += 1;
            self.total_hashtags += hashtag_count;
        }
    }
}

/// One output line of `scan`
#[derive(Debug, Serialize)]
struct ScannedPost {
    line: usize,
    hashtags: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Normalize { tag } => {
            let key = normalize_tag(&tag);
            if key.is_empty() {
                bail!("'{}' is not a valid hashtag", tag);
            }
            println!("{}", key);
        }
        Command::Extract { text } => {
            let text = read_text(text)?;
            print_json(&extract_hashtags(&text), args.pretty)?;
        }
        Command::Linkify { text, href_base } => {
            let text = read_text(text)?;
            let linker = TagLinker::new(href_base);
            print_json(&linker.linkify(&text), args.pretty)?;
        }
        Command::Scan {
            file,
            progress_interval,
        } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let stdout = io::stdout();
            let mut out = stdout.lock();
            let stats = scan_posts(&content, progress_interval, &mut out)?;
            out.flush().context("Failed to flush output")?;

            display_stats(&stats);
        }
    }

    Ok(())
}

/// Use the argument if given, otherwise all of stdin
fn read_text(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Write one JSON line per non-empty post and return the totals
fn scan_posts<W: Write>(content: &str, progress_interval: usize, out: &mut W) -> Result<ScanStats> {
    let mut stats = ScanStats::default();
    let mut unique = HashSet::new();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let hashtags: Vec<String> = extract_hashtags(line).into_iter().map(|m| m.key).collect();
        for key in &hashtags {
            unique.insert(key.clone());
        }
        stats.record_post(hashtags.len());

        let record = ScannedPost {
            line: index + 1,
            hashtags,
        };
        serde_json::to_writer(&mut *out, &record).context("Failed to write scan result")?;
        writeln!(out).context("Failed to write scan result")?;

        if progress_interval > 0 && stats.posts_scanned % progress_interval == 0 {
            eprintln!("   Scanned {} posts...", stats.posts_scanned);
        }
    }

    stats.unique_hashtags = unique.len();
    Ok(stats)
}

fn display_stats(stats: &ScanStats) {
    eprintln!();
    eprintln!("📊 Scan Results:");
    eprintln!("   Posts scanned:        {}", stats.posts_scanned);
    eprintln!("   Posts with hashtags:  {}", stats.posts_with_hashtags);
    eprintln!("   Hashtags found:       {}", stats.total_hashtags);
    eprintln!("   Unique hashtags:      {}", stats.unique_hashtags);
}
