//! Terminal front end: asks the server for recommendations and prints each
//! section as soon as it arrives.

use std::collections::HashSet;

use clap::Parser;
use moodmatch::{
    client::{RecommendationClient, ViewState},
    models::{Category, Recommendation},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "moodmatch-ask", about = "Personalized recommendations based on how you feel")]
struct Args {
    /// Base URL of the MoodMatch server
    #[arg(long, env = "MOODMATCH_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// How you are feeling
    #[arg(required = true, num_args = 1..)]
    feeling: Vec<String>,
}

/// Prints only what changed since the previous redraw
#[derive(Default)]
struct Printer {
    message: Option<String>,
    shown: HashSet<Category>,
    error_shown: bool,
}

impl Printer {
    fn redraw(&mut self, view: &ViewState) {
        if view.loading && self.message.as_deref() != Some(view.message.as_str()) {
            println!("… {}", view.message);
            self.message = Some(view.message.clone());
        }

        for category in Category::ALL {
            if self.shown.contains(&category) {
                continue;
            }
            if let Some(items) = view.recommendations.section(category) {
                print_section(category, items);
                self.shown.insert(category);
            }
        }

        if let (Some(error), false) = (&view.error, self.error_shown) {
            eprintln!("error: {}", error);
            self.error_shown = true;
        }
    }
}

fn print_section(category: Category, items: &[Recommendation]) {
    println!("\n{}", category.heading());
    for item in items {
        println!("  • {}", item.title);
        println!("    {}", item.reason);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let feeling = args.feeling.join(" ");

    let client = RecommendationClient::new(&args.server);
    let mut view = ViewState::new();
    let mut printer = Printer::default();

    let submitted = client
        .request(&feeling, &mut view, |view| printer.redraw(view))
        .await;

    if !submitted || view.error.is_some() {
        std::process::exit(1);
    }
}
