use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use lwis::state::DEFAULT_MEMORY_SIZE;
use lwis::{IoConsole, Machine, Program, RunOutcome, VmConfig};

#[derive(Parser)]
#[command(name = "lwis")]
#[command(about = "Interpreter for the LWIS register machine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Run {
        #[arg(help = "Program image: one instruction word per line, decimal or 0x hex")]
        program: PathBuf,

        #[arg(
            short,
            long,
            default_value_t = DEFAULT_MEMORY_SIZE,
            help = "Number of 32-bit memory cells"
        )]
        memory_size: usize,

        #[arg(long, help = "Print run statistics or the fault report as JSON")]
        json: bool,
    },
    Disasm {
        #[arg(help = "Program image to list")]
        program: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            program,
            memory_size,
            json,
        } => {
            let image = load_program(&program)?;
            let config = VmConfig::default().with_memory_size(memory_size);
            let mut vm = Machine::new(image, config, IoConsole::stdio());

            match vm.run() {
                RunOutcome::Halted(stats) => {
                    if json {
                        let average_us = stats
                            .average_per_instruction()
                            .map(|d| d.as_secs_f64() * 1e6);
                        let report = serde_json::json!({
                            "status": "halted",
                            "total_time_seconds": stats.elapsed.as_secs_f64(),
                            "instructions_executed": stats.instructions_executed,
                            "average_time_per_instruction_us": average_us,
                        });
                        println!("{report}");
                    } else {
                        println!("{stats}");
                    }
                }
                RunOutcome::Faulted(report) => {
                    if json {
                        let report = serde_json::json!({
                            "status": "faulted",
                            "fault": report.fault.to_string(),
                            "pc": report.pc,
                            "family": report.family,
                            "opcode": report.opcode,
                            "operands": report.operands,
                            "instructions_executed": report.instructions_executed,
                        });
                        println!("{report}");
                    } else {
                        eprintln!("Error!");
                        eprintln!("{report}");
                        eprintln!("Instructions Executed: {}", report.instructions_executed);
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Disasm { program } => {
            let image = load_program(&program)?;
            for (index, word, decoded) in image.disassemble() {
                match decoded {
                    Ok(instr) => {
                        let fields = instr.fields();
                        println!("{index}: {}.{} {instr}", fields.family, fields.opcode);
                    }
                    Err(fault) => println!("{index}: {fault} (word {word:#018x})"),
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_program(path: &Path) -> Result<Program> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Program::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
}
