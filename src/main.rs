use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use clap::Parser;
use colored::Colorize;
use log::{debug, info};
use reg_nfa::{document, lexer::render, CompileFlags, RegexNFA};

/// Compile a regular expression into a Thompson NFA and write it as JSON.
#[derive(Parser, Debug)]
#[command(name = "reg_nfa", version, about)]
struct Args {
    /// Pattern to compile. Prompts for one when omitted.
    pattern: Option<String>,

    /// Where to write the automaton document.
    #[arg(short, long, default_value = "nfa.json")]
    output: PathBuf,

    /// Also write a Graphviz rendering of the automaton.
    #[arg(long, value_name = "PATH")]
    dot: Option<PathBuf>,

    /// Print the postfix form of the pattern.
    #[arg(long)]
    postfix: bool,

    /// Disable grouping of single-symbol alternation operands.
    #[arg(long)]
    no_bracket: bool,

    /// Do not echo the document to stdout.
    #[arg(short, long)]
    quiet: bool,
}

fn read_pattern() -> io::Result<String> {
    print!("Enter regular expression: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let pattern = match args.pattern {
        Some(pattern) => pattern,
        None => read_pattern()?,
    };
    info!("compiling {:?}", pattern);

    let flags = if args.no_bracket {
        CompileFlags::NO_FLAG
    } else {
        CompileFlags::default()
    };
    let mut regex = RegexNFA::with_flags(&pattern, flags);
    if let Err(err) = regex.compile() {
        debug!("compilation of {:?} failed: {}", pattern, err);
        println!("{}", "regular expression is not valid".red().bold());
        return Ok(());
    }
    let fragment = match regex.fragment() {
        Ok(fragment) => fragment,
        Err(err) => {
            debug!("{}", err);
            println!("{}", "regular expression is not valid".red().bold());
            return Ok(());
        }
    };

    if args.postfix {
        println!("{} {}", "postfix:".green(), render(regex.postfix()));
    }

    let text = document::to_json_pretty(fragment);
    if !args.quiet {
        println!("{}", text);
    }
    fs::write(&args.output, &text)?;
    info!("wrote {}", args.output.display());

    if let Some(path) = args.dot {
        fs::write(&path, fragment.to_dot())?;
        info!("wrote {}", path.display());
    }
    Ok(())
}
