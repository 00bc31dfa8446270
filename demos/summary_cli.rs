use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use url_summary::{
    filter_safe_iframe_permissions, log_error_card, log_summary_card, setup_logging, LogConfig,
    SummaryService, SummaryServiceConfig,
};

/// Summarize Reddit post URLs, or sanitize an iframe's allow attribute.
#[derive(Parser, Debug)]
#[command(name = "summary_cli")]
struct Args {
    /// Post URLs to summarize
    urls: Vec<String>,

    /// Iframe markup whose allow attribute should be sanitized
    #[arg(long)]
    iframe: Option<String>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Maximum number of requests in flight
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();

    setup_logging(LogConfig {
        log_level: args.log_level.clone(),
        file_output: false,
        ..Default::default()
    })?;

    if let Some(iframe) = &args.iframe {
        let allowed = filter_safe_iframe_permissions(iframe);
        println!("{}: {}", "allow".bold(), allowed.join("; "));
    }

    if args.urls.is_empty() {
        return Ok(());
    }

    println!("{}", "URL Summary".bold().green());
    println!("{}", "===========".green());

    let service = SummaryService::new_with_config(
        SummaryServiceConfig::new(args.urls.len())
            .with_max_concurrent_requests(args.concurrency.max(1)),
    )?;

    let pb = ProgressBar::new(args.urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let urls: Vec<&str> = args.urls.iter().map(String::as_str).collect();
    let results = service.summarize_batch(&urls).await;

    for (url, result) in urls.iter().zip(results) {
        pb.inc(1);
        match result {
            Ok(summary) => {
                log_summary_card(&summary);
                println!("\n{}: {}", "Title".bold(), summary.title);
                println!("{}: {}", "Site".bold(), summary.site_name);
                if !summary.thumbnail.is_empty() {
                    println!("{}: {}", "Thumbnail".bold(), summary.thumbnail);
                }
                if !summary.player.is_empty() {
                    println!("{}: {}", "Player".bold(), summary.player.url);
                }
                if summary.sensitive {
                    println!("{}", "NSFW".red());
                }
            }
            Err(e) => {
                e.log();
                log_error_card(url, &e);
                eprintln!("{}: {} - {}", "Error".bold().red(), url, e);
            }
        }
    }

    pb.finish_with_message("All URLs processed!");

    Ok(())
}
