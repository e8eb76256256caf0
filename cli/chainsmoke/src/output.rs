//! Colored progress output for the suite.

use chainsmoke_harness::Context;
use colored::Colorize;

/// Bold header announcing a catalog entry.
pub fn case_header(blockchain: &str, name: &str) {
    println!("{}", format!("  {blockchain}: {name}").bold());
}

/// One passed sub-check.
pub fn pass_line(name: &str) {
    println!("{}", format!("    Pass: {name}").green());
}

/// One failed sub-check.
pub fn fail_line(name: &str, detail: &str) {
    eprintln!("{}", format!("    FAILED {name}: {detail}").red());
}

/// Bold per-test verdict.
pub fn case_footer(blockchain: &str, name: &str, passed: bool) {
    if passed {
        println!("{}\n", format!("  Passed {blockchain}: {name}").green().bold());
    } else {
        eprintln!("{}\n", format!("  FAILED {blockchain}: {name}").red().bold());
    }
}

/// Final two-line summary.
pub fn summary(ctx: &Context) {
    println!();
    println!("==== TEST RESULT ====");
    println!("Tests passed: {}", ctx.successes);
    println!("Tests failed: {}", ctx.fails);
    println!("=====================");
    println!();
}
