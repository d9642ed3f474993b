use clap::Subcommand;

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the browser chat surface
    Serve {
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Chat in the terminal
    Chat,
}
