use anyhow::Result;
use clap::Parser;
use reelrec::catalog::Movie;
use reelrec::config::App;
use reelrec::interaction::InteractionKind;

/// reelrec - movie recommendation client
///
/// Browse, search, and rate movies against a reelrec backend, and pull
/// personalized recommendations once signed in.
///
/// The backend host is taken from --api-url or the REELREC_API_URL
/// environment variable, defaulting to a local development server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend API URL (defaults to http://localhost:8000)
    #[arg(
        long = "api-url",
        env = "REELREC_API_URL",
        value_name = "URL",
        global = true
    )]
    api_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List movies
    Movies(MoviesArgs),

    /// Show a single movie
    Show { id: String },

    /// Search the catalog
    Search { query: String },

    /// Movies similar to the given one
    Similar { id: String },

    /// Currently popular movies
    Popular,

    /// Personalized recommendations (requires sign-in)
    Recommend,

    /// Record an interaction: view, rate, favorite, or watchlist
    Record {
        id: String,
        kind: String,
        /// Numeric value for the interaction (e.g. a rating)
        #[arg(long)]
        value: Option<f64>,
    },

    /// Your interaction history (requires sign-in)
    History,

    /// Sign in and store the session
    Login {
        email: String,
        #[arg(long, env = "REELREC_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        email: String,
        #[arg(long, env = "REELREC_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and discard the stored session
    Logout,

    /// Show the signed-in account
    Whoami,
}

#[derive(clap::Args, Debug)]
struct MoviesArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long, default_value_t = 20)]
    limit: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let app = App::new(cli.api_url)?;

    use reelrec::auth::SessionProvider;

    match cli.command {
        Commands::Movies(args) => {
            print_movies(&app.catalog.list(args.page, args.limit).await?);
        }
        Commands::Show { id } => {
            print_movie_detail(&app.catalog.get(&id).await?);
        }
        Commands::Search { query } => {
            print_movies(&app.catalog.search(&query).await?);
        }
        Commands::Similar { id } => {
            print_movies(&app.catalog.similar(&id).await?);
        }
        Commands::Popular => {
            print_movies(&app.catalog.popular().await?);
        }
        Commands::Recommend => {
            print_movies(&app.catalog.for_user().await?);
        }
        Commands::Record { id, kind, value } => {
            let kind: InteractionKind = kind.parse()?;
            app.interactions.record(&id, kind, value).await?;
            println!("Recorded {} for {}", kind, id);
        }
        Commands::History => {
            let interactions = app.interactions.list_mine().await?;
            if interactions.is_empty() {
                println!("No interactions recorded.");
            }
            for interaction in interactions {
                let value = interaction
                    .value
                    .map(|v| format!(" ({})", v))
                    .unwrap_or_default();
                println!("{} {}{}", interaction.kind, interaction.movie_id, value);
            }
        }
        Commands::Login { email, password } => {
            app.sessions.sign_in_with_password(&email, &password).await?;
            println!("Signed in as {}", email);
        }
        Commands::Register { email, password } => {
            let profile = app.auth.register(&email, &password).await?;
            println!("Registered {}", profile.email);
        }
        Commands::Logout => {
            app.sessions.sign_out().await?;
            println!("Signed out.");
        }
        Commands::Whoami => {
            let profile = app.auth.verify().await?;
            match profile.name {
                Some(name) => println!("{} <{}>", name, profile.email),
                None => println!("{}", profile.email),
            }
        }
    }
    Ok(())
}

fn print_movies(movies: &[Movie]) {
    if movies.is_empty() {
        println!("No movies found.");
        return;
    }
    for movie in movies {
        match movie.year {
            Some(year) => println!("{}  {} ({})", movie.id, movie.title, year),
            None => println!("{}  {}", movie.id, movie.title),
        }
    }
}

fn print_movie_detail(movie: &Movie) {
    println!("Title: {}", movie.title);
    if let Some(year) = movie.year {
        println!("Year: {}", year);
    }
    if !movie.genres.is_empty() {
        println!("Genres: {}", movie.genres.join(", "));
    }
    if let Some(rating) = movie.rating {
        println!("Rating: {:.1}", rating);
    }
    if let Some(ref overview) = movie.overview {
        println!("\n{}", overview);
    }
}
