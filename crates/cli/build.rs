use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("pagechunk")
        .version(env!("CARGO_PKG_VERSION"))
        .author("PageChunk Contributors")
        .about("Turn a web page into frontmatter Markdown and overlapping chunks")
        .arg(clap::arg!([URL] "Page URL (with --html, the URL the HTML was served from)"))
        .arg(clap::arg!(--render "Render the page in a headless browser instead of a plain GET"))
        .arg(
            clap::arg!(-t --target_words <NUM> "Target words per chunk (0 uses the default)")
                .value_name("NUM")
                .default_value("1000"),
        )
        .arg(clap::arg!(--raw "Print the composed Markdown instead of JSON"))
        .arg(
            clap::arg!(--html <FILE> "Process this HTML file (\"-\" for stdin) instead of fetching")
                .value_name("FILE")
                .value_hint(clap::ValueHint::FilePath),
        )
        .arg(
            clap::arg!(--cache_dir <DIR> "Directory holding cached results")
                .value_name("DIR")
                .default_value(".cache")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--no_cache "Neither read nor write the cache"))
        .arg(clap::arg!(--timeout <SECS> "Fetch/render timeout in seconds").default_value("20"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
        .arg(
            clap::arg!(--completions <SHELL> "Print a shell completion script and exit")
                .value_name("SHELL")
                .value_parser(["bash", "zsh", "fish", "powershell", "elvish"]),
        );

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        clap_complete::generate_to(shell, &mut cmd, "pagechunk", &completions_dir).unwrap();
    }

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
