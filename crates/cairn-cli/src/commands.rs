use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use cairn_sdk::{flatten, hash_payload, Object, ObjectId, ObjectKind, Repository};
use colored::Colorize;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let start = cli.repo.as_path();
    match cli.command {
        Command::Init(args) => cmd_init(start, args),
        Command::CatFile(args) => cmd_cat_file(&open(start)?, args),
        Command::HashObject(args) => cmd_hash_object(start, args),
        Command::LsTree(args) => cmd_ls_tree(&open(start)?, args),
        Command::Log(args) => cmd_log(&open(start)?, args),
        Command::Checkout(args) => cmd_checkout(&open(start)?, args),
        Command::RevParse(args) => cmd_rev_parse(&open(start)?, args),
        Command::ShowRef => cmd_show_ref(&open(start)?),
        Command::Tag(args) => cmd_tag(&open(start)?, args),
    }
}

fn open(start: &Path) -> anyhow::Result<Repository> {
    let repo = Repository::discover(start)
        .with_context(|| format!("no repository at or above {}", start.display()))?;
    debug!(worktree = %repo.worktree().display(), "opened repository");
    Ok(repo)
}

fn cmd_init(start: &Path, args: InitArgs) -> anyhow::Result<()> {
    let path = args.path.unwrap_or_else(|| start.to_path_buf());
    let repo = Repository::init(&path)?;
    println!(
        "{} Initialized empty cairn repository in {}",
        "✓".green().bold(),
        repo.gitdir().display().to_string().bold()
    );
    Ok(())
}

fn cmd_cat_file(repo: &Repository, args: CatFileArgs) -> anyhow::Result<()> {
    let id = repo.resolve(&args.object, Some(args.kind.into()), true)?;
    let object = repo.read_object(&id)?;
    io::stdout().write_all(&object.encode())?;
    Ok(())
}

fn cmd_hash_object(start: &Path, args: HashObjectArgs) -> anyhow::Result<()> {
    let data = fs::read(&args.path).with_context(|| format!("reading {}", args.path.display()))?;
    let kind = ObjectKind::from(args.kind);
    let id = if args.write {
        open(start)?.hash_object(kind, &data, true)?
    } else {
        hash_payload(kind, &data)?
    };
    println!("{id}");
    Ok(())
}

fn cmd_ls_tree(repo: &Repository, args: LsTreeArgs) -> anyhow::Result<()> {
    let tree = repo.resolve(&args.tree, Some(ObjectKind::Tree), true)?;
    let mut out = io::stdout().lock();
    for (path, entry) in repo.ls_tree(&tree, args.recursive)? {
        writeln!(
            out,
            "{:0>6} {} {}\t{}",
            entry.mode.to_string(),
            entry.mode.object_kind(),
            entry.object_id,
            path
        )?;
    }
    Ok(())
}

fn cmd_log(repo: &Repository, args: LogArgs) -> anyhow::Result<()> {
    let start = repo.resolve(&args.commit, Some(ObjectKind::Commit), true)?;
    let mut out = io::stdout().lock();

    writeln!(out, "digraph cairnlog{{")?;
    writeln!(out, "  node[shape=rect]")?;
    write_node(&mut out, repo, &start)?;

    let mut labelled = HashSet::from([start]);
    for edge in repo.walk(&start) {
        let edge = edge?;
        writeln!(out, "  c_{} -> c_{};", edge.child, edge.parent)?;
        if labelled.insert(edge.parent) {
            write_node(&mut out, repo, &edge.parent)?;
        }
    }
    writeln!(out, "}}")?;
    Ok(())
}

fn write_node(out: &mut impl Write, repo: &Repository, id: &ObjectId) -> anyhow::Result<()> {
    let Object::Commit(commit) = repo.read_object(id)? else {
        anyhow::bail!("{id} is not a commit");
    };
    let message = commit.message();
    let summary = message
        .lines()
        .next()
        .unwrap_or_default()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    writeln!(out, "  c_{id} [label=\"{}: {summary}\"]", id.short_hex())?;
    Ok(())
}

fn cmd_checkout(repo: &Repository, args: CheckoutArgs) -> anyhow::Result<()> {
    let tree = repo.resolve(&args.commit, Some(ObjectKind::Tree), true)?;
    let files = repo.checkout(&tree, &args.path)?;
    println!(
        "{} Checked out {} files into {}",
        "✓".green().bold(),
        files,
        args.path.display().to_string().bold()
    );
    Ok(())
}

fn cmd_rev_parse(repo: &Repository, args: RevParseArgs) -> anyhow::Result<()> {
    let id = repo.resolve(&args.name, args.kind.map(Into::into), !args.no_follow)?;
    println!("{id}");
    Ok(())
}

fn cmd_show_ref(repo: &Repository) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    for (name, id) in flatten(&repo.list_refs("refs")?, "refs") {
        writeln!(out, "{id} {name}")?;
    }
    Ok(())
}

fn cmd_tag(repo: &Repository, args: TagArgs) -> anyhow::Result<()> {
    let Some(name) = args.name else {
        for (name, _) in flatten(&repo.list_refs("refs/tags")?, "") {
            println!("{name}");
        }
        return Ok(());
    };

    let target = repo.resolve(&args.object, None, true)?;
    if args.annotate {
        let mut message = args.message.unwrap_or_default();
        if !message.ends_with('\n') {
            message.push('\n');
        }
        let tag = repo.create_annotated_tag(&name, &target, &repo.identity(), &message)?;
        println!("{} Created tag {} ({})", "✓".green().bold(), name.yellow(), tag.short_hex());
    } else {
        repo.tag(&name, &target)?;
        println!("{} Created tag {}", "✓".green().bold(), name.yellow());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    fn run(args: &[&str]) -> anyhow::Result<()> {
        run_command(Cli::try_parse_from(args.iter().copied())?)
    }

    #[test]
    fn init_then_tag_a_blob() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        run(&["cairn", "-C", root, "init"]).unwrap();

        let file = dir.path().join("greeting.txt");
        fs::write(&file, b"hello world\n").unwrap();
        run(&["cairn", "-C", root, "hash-object", "-w", file.to_str().unwrap()]).unwrap();

        run(&["cairn", "-C", root, "tag", "greeting", "3b18e51"]).unwrap();
        let repo = Repository::open(dir.path()).unwrap();
        assert_eq!(
            repo.resolve("greeting", None, true).unwrap().to_hex(),
            "3b18e512dba79e4c8300dd08aeb37f8e728b8dad"
        );
    }

    #[test]
    fn annotated_tag_gets_newline_terminated_message() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        run(&["cairn", "-C", root, "init"]).unwrap();
        let repo = Repository::open(dir.path()).unwrap();
        let blob = repo.hash_object(ObjectKind::Blob, b"x\n", true).unwrap();

        run(&["cairn", "-C", root, "tag", "-a", "v1", &blob.to_hex(), "-m", "first"]).unwrap();

        let tag_id = repo.resolve("v1", Some(ObjectKind::Tag), false).unwrap();
        let Object::Tag(tag) = repo.read_object(&tag_id).unwrap() else {
            panic!("expected tag");
        };
        assert_eq!(tag.message(), "first\n");
        assert_eq!(tag.object().unwrap(), blob);
    }

    #[test]
    fn commands_outside_repository_fail() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        assert!(run(&["cairn", "-C", root, "show-ref"]).is_err());
    }

    #[test]
    fn checkout_rejects_occupied_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        run(&["cairn", "-C", root, "init"]).unwrap();
        let repo = Repository::open(dir.path()).unwrap();
        let tree = repo.hash_object(ObjectKind::Tree, b"", true).unwrap();

        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("busy"), b"").unwrap();
        assert!(run(&["cairn", "-C", root, "checkout", &tree.to_hex(), dest.to_str().unwrap()]).is_err());
    }
}
