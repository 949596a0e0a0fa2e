use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "Organize projects, boards, lists and cards from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the board data (overrides the config file)
    #[arg(long, global = true, value_name = "DIR", env = "TASKFLOW_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Do not create the starter board when nothing is stored yet
    #[arg(long, global = true)]
    pub no_seed: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Project operations
    Project(ProjectCommand),
    /// Board operations
    Board(BoardCommand),
    /// List operations
    List(ListCommand),
    /// Card operations
    Card(CardCommand),
    /// Label catalog
    Label(LabelCommand),
    /// Show the sidebar and the active board
    View,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Project commands
#[derive(Args)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Create {
        #[arg(long)]
        title: String,
    },
    /// List all projects
    List,
    /// Delete a project and everything in it
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Expand or collapse a project in the sidebar
    Expand {
        #[arg(long)]
        id: String,
    },
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Create a new board in a project
    Create {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        title: String,
    },
    /// List boards, optionally for one project
    List {
        #[arg(long)]
        project_id: Option<String>,
    },
    /// Get a board, the active one by default
    Get {
        #[arg(long)]
        id: Option<String>,
    },
    /// Delete a board and its lists
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Make a board the active one
    Activate {
        #[arg(long)]
        id: String,
    },
}

// List commands
#[derive(Args)]
pub struct ListCommand {
    #[command(subcommand)]
    pub action: ListAction,
}

#[derive(Subcommand)]
pub enum ListAction {
    /// Append a list to a board
    Create {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        title: String,
    },
    /// Delete a list and its cards
    Delete {
        #[arg(long)]
        id: String,
    },
}

// Card commands
#[derive(Args)]
pub struct CardCommand {
    #[command(subcommand)]
    pub action: CardAction,
}

#[derive(Subcommand)]
pub enum CardAction {
    /// Append a card to a list
    Create(CardCreateArgs),
    /// Get a specific card
    Get {
        #[arg(long)]
        id: String,
    },
    /// Update a card
    Update(CardUpdateArgs),
    /// Delete a card
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Move a card to the end of another list on the same board
    Move {
        #[arg(long)]
        id: String,
        #[arg(long)]
        list_id: String,
    },
    /// Add or remove a label on a card
    ToggleLabel {
        #[arg(long)]
        id: String,
        #[arg(long)]
        label_id: String,
    },
}

#[derive(Args)]
pub struct CardCreateArgs {
    #[arg(long)]
    pub list_id: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Comma-separated label names
    #[arg(long, value_delimiter = ',')]
    pub labels: Vec<String>,
}

#[derive(Args)]
pub struct CardUpdateArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    /// Replace the card's labels with these comma-separated names
    #[arg(long, value_delimiter = ',', conflicts_with = "clear_labels")]
    pub labels: Option<Vec<String>>,
    #[arg(long)]
    pub clear_labels: bool,
}

// Label commands
#[derive(Args)]
pub struct LabelCommand {
    #[command(subcommand)]
    pub action: LabelAction,
}

#[derive(Subcommand)]
pub enum LabelAction {
    /// List the label catalog
    List,
}
