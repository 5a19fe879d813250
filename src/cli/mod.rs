use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grade {
    #[value(name = "class-1", alias = "1")]
    Class1,
    #[value(name = "class-2", alias = "2")]
    Class2,
    #[value(name = "class-3", alias = "3")]
    Class3,
    #[value(name = "class-4", alias = "4")]
    Class4,
    #[value(name = "class-5", alias = "5")]
    Class5,
    #[value(name = "class-6", alias = "6")]
    Class6,
    #[value(name = "class-7", alias = "7")]
    Class7,
    #[value(name = "class-8", alias = "8")]
    Class8,
    #[value(name = "class-9", alias = "9")]
    Class9,
    #[value(name = "class-10", alias = "10")]
    Class10,
    #[value(name = "class-11", alias = "11")]
    Class11,
    #[value(name = "class-12", alias = "12")]
    Class12,
}

impl Grade {
    pub const ALL: [Grade; 12] = [
        Grade::Class1, Grade::Class2, Grade::Class3, Grade::Class4,
        Grade::Class5, Grade::Class6, Grade::Class7, Grade::Class8,
        Grade::Class9, Grade::Class10, Grade::Class11, Grade::Class12,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Grade::Class1 => "Class 1",
            Grade::Class2 => "Class 2",
            Grade::Class3 => "Class 3",
            Grade::Class4 => "Class 4",
            Grade::Class5 => "Class 5",
            Grade::Class6 => "Class 6",
            Grade::Class7 => "Class 7",
            Grade::Class8 => "Class 8",
            Grade::Class9 => "Class 9",
            Grade::Class10 => "Class 10",
            Grade::Class11 => "Class 11",
            Grade::Class12 => "Class 12",
        }
    }

    /// Inverse of [`Grade::label`]; anything outside the fixed list is `None`.
    pub fn from_label(s: &str) -> Option<Grade> {
        Grade::ALL.into_iter().find(|g| g.label() == s.trim())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Duration {
    #[value(name = "30", alias = "30m")]
    Mins30,
    #[value(name = "40", alias = "40m")]
    Mins40,
    #[value(name = "45", alias = "45m")]
    Mins45,
    #[value(name = "60", alias = "60m")]
    Mins60,
    #[value(name = "90", alias = "90m")]
    Mins90,
}

impl Duration {
    pub const ALL: [Duration; 5] = [
        Duration::Mins30, Duration::Mins40, Duration::Mins45, Duration::Mins60, Duration::Mins90,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Duration::Mins30 => "30 mins",
            Duration::Mins40 => "40 mins",
            Duration::Mins45 => "45 mins",
            Duration::Mins60 => "60 mins",
            Duration::Mins90 => "90 mins",
        }
    }

    pub fn from_label(s: &str) -> Option<Duration> {
        Duration::ALL.into_iter().find(|d| d.label() == s.trim())
    }
}

#[derive(Parser, Debug)]
#[command(name = "lesson_planner", version, about = "Generate structured lesson plans with Gemini")]
pub struct Args {
    /// TOML config file overlaying the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Gemini model identifier (overrides config)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Gemini API key (falls back to GEMINI_API_KEY, then the secrets file)
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the lesson plan form over HTTP
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate one lesson plan and print it to the terminal
    Generate(GenerateArgs),
    /// List models that support content generation
    Models,
}

#[derive(ClapArgs, Debug)]
pub struct GenerateArgs {
    #[arg(long, value_enum, default_value_t = Grade::Class1)]
    pub grade: Grade,

    #[arg(long)]
    pub subject: String,

    /// Chapter or topic
    #[arg(long)]
    pub topic: String,

    #[arg(long, value_enum, default_value_t = Duration::Mins30)]
    pub duration: Duration,

    /// Skip the image probes
    #[arg(long, default_value_t = false)]
    pub no_images: bool,
}
