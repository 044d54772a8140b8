use clap::{Parser, ValueHint};

/// FormKey: collect form submissions for anonymous form owners.
#[derive(Parser, Debug)]
#[clap(name = "fk-server", version = "0.1")]
pub struct Opts {
    #[clap(subcommand)]
    pub subcmd: Subcommand,
}

#[derive(Parser, Debug)]
pub enum Subcommand {
    Gen(GenOpts),
    Form(FormOpts),
    Server(ServerOpts),
}

/// Generate the process-wide server key and token key.
#[derive(Parser, Debug)]
#[clap(name = "Gen")]
pub struct GenOpts {
    /// Path to store the server key (form key derivation).
    #[clap(long, default_value = "./fk_server.key", value_hint = ValueHint::FilePath)]
    pub server_key_path: String,

    /// Path to store the token key (email token encryption).
    #[clap(long, default_value = "./fk_token.key", value_hint = ValueHint::FilePath)]
    pub token_key_path: String,
}

/// Generate a new form secret and print it with its form key.
#[derive(Parser, Debug)]
#[clap(name = "Form")]
pub struct FormOpts {
    /// Path to the server key.
    #[clap(
        long,
        env = "FK_SERVER_KEY_PATH",
        default_value = "./fk_server.key",
        value_hint = ValueHint::FilePath
    )]
    pub server_key_path: String,
}

/// Run the FormKey HTTP service.
#[derive(Parser, Debug)]
#[clap(name = "Server")]
pub struct ServerOpts {
    /// Host to bind this service to.
    #[clap(short = 'H', long, env = "FK_HOST", default_value = "0.0.0.0", value_hint = ValueHint::Hostname)]
    pub host: String,

    /// Port to bind this service to.
    #[clap(short, long, env = "FK_PORT", default_value = "8087")]
    pub port: String,

    /// Path to the server key.
    #[clap(
        long,
        env = "FK_SERVER_KEY_PATH",
        default_value = "./fk_server.key",
        value_hint = ValueHint::FilePath
    )]
    pub server_key_path: String,

    /// Path to the token key.
    #[clap(
        long,
        env = "FK_TOKEN_KEY_PATH",
        default_value = "./fk_token.key",
        value_hint = ValueHint::FilePath
    )]
    pub token_key_path: String,

    /// SQLite database URL, e.g. `sqlite:///data/data.db?mode=rwc`. Submissions are kept in
    /// memory when absent.
    #[clap(long, env = "FK_DATABASE_URL", value_hint = ValueHint::Url)]
    pub database_url: Option<String>,

    /// HTTP mail relay that accepts `{to, subject, body}` as JSON. Mail is only logged when
    /// absent.
    #[clap(long, env = "FK_MAIL_RELAY", value_hint = ValueHint::Url)]
    pub mail_relay: Option<String>,

    /// Bearer token for the mail relay.
    #[clap(long, env = "FK_MAIL_RELAY_TOKEN")]
    pub mail_relay_token: Option<String>,

    /// Bound on a single mail delivery, in seconds.
    #[clap(long, env = "FK_MAIL_TIMEOUT", default_value = "10")]
    pub mail_timeout: u64,

    /// Maximum age of an email token, in seconds.
    #[clap(long, env = "FK_TOKEN_MAX_AGE", default_value = "604800")]
    pub token_max_age: u64,
}
