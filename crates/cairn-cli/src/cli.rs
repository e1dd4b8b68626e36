use std::path::PathBuf;

use cairn_sdk::ObjectKind;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "cairn",
    about = "cairn: a content-addressed object store with git's on-disk format",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "repo", global = true, default_value = ".")]
    pub repo: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new, empty repository
    Init(InitArgs),
    /// Print the raw payload of an object
    CatFile(CatFileArgs),
    /// Compute an object digest, optionally storing the object
    HashObject(HashObjectArgs),
    /// List the contents of a tree
    LsTree(LsTreeArgs),
    /// Print commit history as a Graphviz graph
    Log(LogArgs),
    /// Materialize a commit's tree into an empty directory
    Checkout(CheckoutArgs),
    /// Resolve a revision name to a digest
    RevParse(RevParseArgs),
    /// List references
    ShowRef,
    /// List tags, or create one
    Tag(TagArgs),
}

/// Object kind as given on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl From<KindArg> for ObjectKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Blob => ObjectKind::Blob,
            KindArg::Tree => ObjectKind::Tree,
            KindArg::Commit => ObjectKind::Commit,
            KindArg::Tag => ObjectKind::Tag,
        }
    }
}

#[derive(Args)]
pub struct InitArgs {
    /// Where to create the repository (defaults to --repo)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CatFileArgs {
    #[arg(value_enum)]
    pub kind: KindArg,
    pub object: String,
}

#[derive(Args)]
pub struct HashObjectArgs {
    #[arg(short = 't', long = "type", value_enum, default_value = "blob")]
    pub kind: KindArg,
    /// Store the object in the repository
    #[arg(short, long)]
    pub write: bool,
    pub path: PathBuf,
}

#[derive(Args)]
pub struct LsTreeArgs {
    /// Recurse into subtrees
    #[arg(short, long)]
    pub recursive: bool,
    pub tree: String,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(default_value = "HEAD")]
    pub commit: String,
}

#[derive(Args)]
pub struct CheckoutArgs {
    pub commit: String,
    pub path: PathBuf,
}

#[derive(Args)]
pub struct RevParseArgs {
    /// Coerce the result to this kind
    #[arg(short = 't', long = "type", value_enum)]
    pub kind: Option<KindArg>,
    /// Require the name to already be of --type
    #[arg(long)]
    pub no_follow: bool,
    pub name: String,
}

#[derive(Args)]
pub struct TagArgs {
    /// Create an annotated tag object
    #[arg(short = 'a')]
    pub annotate: bool,
    pub name: Option<String>,
    #[arg(default_value = "HEAD")]
    pub object: String,
    #[arg(short, long)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["cairn", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init(InitArgs { path: None })));
        assert_eq!(cli.repo, PathBuf::from("."));
    }

    #[test]
    fn parse_cat_file() {
        let cli = Cli::try_parse_from(["cairn", "cat-file", "commit", "HEAD"]).unwrap();
        if let Command::CatFile(args) = cli.command {
            assert_eq!(args.kind, KindArg::Commit);
            assert_eq!(args.object, "HEAD");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn reject_unknown_kind() {
        assert!(Cli::try_parse_from(["cairn", "cat-file", "widget", "HEAD"]).is_err());
    }

    #[test]
    fn parse_hash_object() {
        let cli = Cli::try_parse_from(["cairn", "hash-object", "-w", "-t", "tree", "f"]).unwrap();
        if let Command::HashObject(args) = cli.command {
            assert!(args.write);
            assert_eq!(args.kind, KindArg::Tree);
            assert_eq!(args.path, PathBuf::from("f"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn hash_object_defaults_to_blob() {
        let cli = Cli::try_parse_from(["cairn", "hash-object", "f"]).unwrap();
        if let Command::HashObject(args) = cli.command {
            assert!(!args.write);
            assert_eq!(args.kind, KindArg::Blob);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_ls_tree_recursive() {
        let cli = Cli::try_parse_from(["cairn", "ls-tree", "-r", "HEAD"]).unwrap();
        if let Command::LsTree(args) = cli.command {
            assert!(args.recursive);
            assert_eq!(args.tree, "HEAD");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn log_defaults_to_head() {
        let cli = Cli::try_parse_from(["cairn", "log"]).unwrap();
        if let Command::Log(args) = cli.command {
            assert_eq!(args.commit, "HEAD");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_rev_parse() {
        let cli = Cli::try_parse_from(["cairn", "rev-parse", "--type", "tree", "--no-follow", "v1"]).unwrap();
        if let Command::RevParse(args) = cli.command {
            assert_eq!(args.kind, Some(KindArg::Tree));
            assert!(args.no_follow);
            assert_eq!(args.name, "v1");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_show_ref() {
        let cli = Cli::try_parse_from(["cairn", "show-ref"]).unwrap();
        assert!(matches!(cli.command, Command::ShowRef));
    }

    #[test]
    fn parse_annotated_tag() {
        let cli = Cli::try_parse_from(["cairn", "tag", "-a", "v1", "abc1234", "-m", "release"]).unwrap();
        if let Command::Tag(args) = cli.command {
            assert!(args.annotate);
            assert_eq!(args.name.as_deref(), Some("v1"));
            assert_eq!(args.object, "abc1234");
            assert_eq!(args.message.as_deref(), Some("release"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_tag_list() {
        let cli = Cli::try_parse_from(["cairn", "tag"]).unwrap();
        if let Command::Tag(args) = cli.command {
            assert!(args.name.is_none());
            assert_eq!(args.object, "HEAD");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cairn", "show-ref", "-v", "-C", "/tmp/x"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.repo, PathBuf::from("/tmp/x"));
    }
}
