#[macro_use]
extern crate clap;
use boolsimp::environment::{Environment, EnvironmentBuilder};
use boolsimp::error::Result;
use boolsimp::loader;
use boolsimp::simplify::SimplifyBooleanExpression;
use boolsimp::util::DumpToFile;
use clap::{Arg, ArgMatches};
use colored::*;
use console::style;
use std::path::Path;
use std::process;

fn main() {
    let arguments = app_from_crate!()
        .arg(
            Arg::with_name("environment_file")
                .short("e")
                .long("env")
                .value_name("FILE")
                .help("Sets environment file to use")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("offset")
                .short("p")
                .long("offset")
                .value_name("BYTE")
                .help("Sets the cursor byte offset within the expression")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("check_only")
                .short("c")
                .long("check")
                .help("Only reports whether the action is applicable"),
        )
        .arg(
            Arg::with_name("fixpoint")
                .long("fixpoint")
                .value_name("MODE")
                .possible_values(&["yes", "no"])
                .help("Re-applies the action until nothing simplifies (overwrites environment)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("max_passes")
                .long("max-passes")
                .value_name("N")
                .help("Bounds the number of rewrites in fixpoint mode (overwrites environment)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("ast_file")
                .long("ast")
                .value_name("FILE")
                .help("Prints the parsed (normalized) expression into the file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Enables debug mode"),
        )
        .arg(
            Arg::with_name("input_file")
                .value_name("FILE")
                .help("File containing the expression to simplify")
                .required(true)
                .index(1),
        )
        .get_matches();

    if let Err(e) = simplify(&arguments) {
        println!("{}", style(e).bold().red());
        process::exit(-1);
    }
}

fn build_environment(arguments: &ArgMatches) -> Result<Environment> {
    let mut env_builder = EnvironmentBuilder::default();

    if let Some(file_path) = arguments.value_of("environment_file") {
        // Load given environment file
        let env_file = Path::new(file_path);
        if !env_file.is_file() {
            return Err(format!("Environment file '{}' does not exist", file_path).into());
        }
        env_builder.from_file(env_file)?;
    } else {
        // Try to find an environment file for the current input
        let input_file = Path::new(arguments.value_of("input_file").unwrap());
        let env_file = input_file.with_extension("yaml");
        if env_file.is_file() {
            println!(
                "Using environment defined in '{}'",
                style(&env_file.to_str().unwrap()).yellow()
            );
            env_builder.from_file(&env_file)?;
        }
    }

    if let Some(mode) = arguments.value_of("fixpoint") {
        env_builder.fixpoint(match mode {
            "yes" => true,
            "no" => false,
            _ => panic!("unknown fixpoint mode"),
        });
    }

    if let Some(passes) = arguments.value_of("max_passes") {
        let passes = passes
            .parse::<usize>()
            .map_err(|_| format!("Invalid pass count '{}'", passes))?;
        env_builder.max_passes(passes);
    }

    if arguments.is_present("debug") {
        env_builder.debug(true);
    }

    Ok(env_builder.build()?)
}

fn simplify(arguments: &ArgMatches) -> Result<()> {
    let input_file = arguments.value_of("input_file").unwrap();

    let env = build_environment(arguments)?;

    if env.debug {
        println!("{}:\n{}\n---", "Environment".bold(), style(&env).cyan());
    }

    println!(
        "{} Parsing '{}'",
        style("[1/3]").bold().dim(),
        input_file.yellow()
    );
    let mut tree = loader::load_file(Path::new(input_file))?;

    if let Some(path) = arguments.value_of("ast_file") {
        tree.dump_to_file(Path::new(path))?;
    }

    let offset = match arguments.value_of("offset") {
        Some(offset) => offset
            .parse::<usize>()
            .map_err(|_| format!("Invalid cursor offset '{}'", offset))?,
        None => 0,
    };
    let cursor = tree
        .node_at_offset(offset)
        .ok_or_else(|| format!("No expression at offset {}", offset))?;

    let action = SimplifyBooleanExpression::new();

    println!("{} Locating target ...", style("[2/3]").bold().dim());
    if !action.is_applicable(&tree, cursor) {
        println!("{}", style("Nothing to simplify.").yellow());
        process::exit(1);
    }

    if arguments.is_present("check_only") {
        println!("{}", style("Simplification is applicable.").bold().green());
        return Ok(());
    }

    println!("{} Rewriting ...", style("[3/3]").bold().dim());
    if env.fixpoint {
        action.apply_to_fixpoint(&mut tree, cursor, env.max_passes)?;
    } else {
        action.apply(&mut tree, cursor)?;
    }

    println!("{}", style(&tree).bold().green());

    Ok(())
}
