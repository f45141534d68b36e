use super::report::Report;
use crate::assembler::{self, disasm};
use crate::spec::types::hw;
use ansi_term::Colour::Red;
use anyhow::{anyhow, Context, Result};
use log::info;
use std::{collections::HashMap, fs, path::PathBuf};
use structopt::StructOpt;

#[cfg(windows)]
fn enable_ansi() {
    if let Err(code) = ansi_term::enable_ansi_support() {
        log::warn!("could not enable terminal ANSI support (error {})", code);
    }
}

#[cfg(not(windows))]
fn enable_ansi() {}

/// Sets up logging (configured by `RUST_LOG`) and the terminal.
pub fn terminal_init() {
    env_logger::init();
    enable_ansi();
}

#[derive(StructOpt, Debug)]
#[structopt(name = "facpu")]
pub enum CommandRoot {
    Asm(SubcommandAsm),
    Disasm(SubcommandDisasm),
}

/// Assemble a source file. Without an output file the words are printed, one per line.
#[derive(StructOpt, Debug)]
#[structopt(name = "facasm")]
pub struct SubcommandAsm {
    #[structopt(name = "in.fas", parse(from_os_str))]
    in_src: PathBuf,

    #[structopt(name = "out.bin", parse(from_os_str))]
    out_bin: Option<PathBuf>,

    /// Print each word with its address, labels and disassembly
    #[structopt(short, long)]
    listing: bool,
}

/// Print the disassembly of an assembled binary.
#[derive(StructOpt, Debug)]
pub struct SubcommandDisasm {
    #[structopt(name = "in.bin", parse(from_os_str))]
    in_bin: PathBuf,
}

pub fn root(cmd: CommandRoot) -> ! {
    match cmd {
        CommandRoot::Asm(scmd) => asm(scmd),
        CommandRoot::Disasm(scmd) => disasm(scmd),
    }
}

fn exit_with(result: Result<bool>) -> ! {
    let code = match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            eprintln!("{} {:#}", Red.bold().paint("error:"), err);
            2
        }
    };

    std::process::exit(code);
}

pub fn asm(cmd: SubcommandAsm) -> ! {
    exit_with(run_asm(&cmd))
}

pub fn disasm(cmd: SubcommandDisasm) -> ! {
    exit_with(run_disasm(&cmd))
}

fn print_listing(program: &assembler::Program) {
    let mut labels: HashMap<usize, Vec<&str>> = HashMap::new();
    for (name, label) in program.labels.sorted() {
        labels.entry(label.address).or_default().push(name);
    }

    for (address, line) in disasm::disassemble(&program.words).into_iter().enumerate() {
        for name in labels.get(&address).into_iter().flatten() {
            println!("{}:", name);
        }
        println!("    {}", line);
    }
}

/// Returns `Ok(false)` if the source failed to assemble (after reporting why).
fn run_asm(cmd: &SubcommandAsm) -> Result<bool> {
    let source = fs::read_to_string(&cmd.in_src)
        .with_context(|| format!("could not read '{}'", cmd.in_src.display()))?;

    let program = match assembler::assemble_program(&source) {
        Ok(program) => program,
        Err(err) => {
            eprint!("{}", Report::new(&err.diagnostic(), &source));
            return Ok(false);
        }
    };

    if cmd.listing {
        print_listing(&program);
    }

    match &cmd.out_bin {
        Some(out_bin) => {
            fs::write(out_bin, hw::words_to_bytes(&program.words))
                .with_context(|| format!("could not write '{}'", out_bin.display()))?;
            info!("wrote {} words to '{}'", program.words.len(), out_bin.display());
        }
        None if !cmd.listing => {
            for word in &program.words {
                println!("{}", word);
            }
        }
        None => (),
    }

    Ok(true)
}

fn run_disasm(cmd: &SubcommandDisasm) -> Result<bool> {
    let bytes = fs::read(&cmd.in_bin)
        .with_context(|| format!("could not read '{}'", cmd.in_bin.display()))?;

    let words = hw::bytes_to_words(&bytes).ok_or_else(|| {
        anyhow!(
            "'{}' is not a whole number of {}-byte words",
            cmd.in_bin.display(),
            hw::BYTES_PER_WORD
        )
    })?;

    for line in disasm::disassemble(&words) {
        println!("{}", line);
    }

    Ok(true)
}
