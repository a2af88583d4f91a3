use sbn_engine::{batch, logging, pipeline};
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize global logging system
    logging::init_global_logging()?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input.sbn|input.yaml|directory> [options]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let input_path = Path::new(&args[1]);
    let options = parse_options(&args[2..]);

    if input_path.is_file() {
        process_single_file(&args[1], &options)?;
    } else if input_path.is_dir() {
        process_directory_batch(input_path, &options.batch)?;
    } else {
        eprintln!("Error: Input must be a scorebook file (.sbn, .yaml, .yml) or directory");
        eprintln!("  Path: {}", input_path.display());
        std::process::exit(1);
    }

    Ok(())
}

struct CliOptions {
    batch: batch::BatchConfig,
    json: bool,
}

fn print_help(program_name: &str) {
    println!("Scorebook Replay Engine v{}", env!("CARGO_PKG_VERSION"));
    println!("Parses scorebook notation and replays it into a game state timeline");
    println!();
    println!("USAGE:");
    println!(
        "    {} <game.sbn>                     # Replay single file",
        program_name
    );
    println!(
        "    {} <directory> [options]          # Replay directory",
        program_name
    );
    println!();
    println!("ARGUMENTS:");
    println!("    <game.sbn>     Path to the scorebook file (.sbn, .yaml, .yml)");
    println!("    <directory>    Path to directory containing scorebook files");
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --json              Print the full replay result as JSON (single file)");
    println!("    --sequential        Force sequential processing (no parallelism)");
    println!("    --parallel          Force parallel processing (default)");
    println!("    --threads N         Set maximum number of threads (default: auto)");
    println!("    --no-recursive      Don't search subdirectories");
    println!("    --max-files N       Limit maximum files to process");
    println!("    --fail-fast         Stop on first error");
    println!("    --quiet             Suppress progress reporting");
    println!();
    println!("SINGLE FILE OUTPUT:");
    println!("    Final score, state count and any replay errors with line numbers");
    println!("    With --json: properties, full state timeline and alternates");
    println!();
    println!("BATCH OUTPUT:");
    println!("    Per-file progress plus a summary with success/failure statistics");
    println!();
    println!("EXAMPLES:");
    println!(
        "    {} game.sbn                        # Single game",
        program_name
    );
    println!(
        "    {} game.yaml --json                # JSON state timeline",
        program_name
    );
    println!(
        "    {} seasons/ --threads 4            # 4 threads max",
        program_name
    );
    println!(
        "    {} seasons/ --sequential --fail-fast # Sequential with early exit",
        program_name
    );
}

fn parse_options(args: &[String]) -> CliOptions {
    let mut config = batch::BatchConfig::default();
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => {
                json = true;
            }
            "--sequential" => {
                config.max_threads = 1;
            }
            "--parallel" => {
                // Keep default parallel setting
            }
            "--threads" => {
                if i + 1 < args.len() {
                    if let Ok(threads) = args[i + 1].parse::<usize>() {
                        config.max_threads = threads.clamp(1, 32);
                        i += 1;
                    } else {
                        eprintln!(
                            "Warning: Invalid thread count '{}', using default",
                            args[i + 1]
                        );
                        i += 1;
                    }
                } else {
                    eprintln!("Warning: --threads requires a number");
                }
            }
            "--no-recursive" => {
                config.recursive = false;
            }
            "--max-files" => {
                if i + 1 < args.len() {
                    if let Ok(max_files) = args[i + 1].parse::<usize>() {
                        config.max_files = Some(max_files);
                        i += 1;
                    } else {
                        eprintln!("Warning: Invalid max files '{}', ignoring", args[i + 1]);
                        i += 1;
                    }
                } else {
                    eprintln!("Warning: --max-files requires a number");
                }
            }
            "--fail-fast" => {
                config.fail_fast = true;
            }
            "--quiet" => {
                config.progress_reporting = false;
            }
            _ => {
                eprintln!("Warning: Unknown option '{}'", args[i]);
            }
        }
        i += 1;
    }

    CliOptions {
        batch: config,
        json,
    }
}

fn process_single_file(
    file_path: &str,
    options: &CliOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    match pipeline::process_file(file_path) {
        Ok(result) => {
            if options.json {
                let output = pipeline::PipelineOutput::from_result(&result);
                println!("{}", output.to_json()?);
            } else {
                print_replay_summary(file_path, &result);
            }

            if !result.is_clean() {
                std::process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("FAILED: {}", error);
            print_detailed_error(&error);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_replay_summary(file_path: &str, result: &pipeline::PipelineResult) {
    let (visitor, home) = result.game.final_score();

    println!("Replayed: {}", file_path);
    println!("  Final score: visitor {} - home {}", visitor, home);
    println!("  Plate appearances replayed: {}", result.game.canonical.len());
    if let Some(metrics) = &result.lexical_metrics {
        println!(
            "  Tokens: {} ({} advances, {} comments)",
            metrics.total_tokens, metrics.advance_tokens, metrics.comment_count
        );
    }
    println!(
        "  Duration: {:.2}ms",
        result.processing_duration.as_secs_f64() * 1000.0
    );

    if result.is_clean() {
        println!("\nSUCCESS: Replay completed without errors");
    } else {
        println!("\nReplay errors:");
        for error in &result.game.errors {
            println!(
                "  [{}] line {}: {}",
                error.error_code(),
                error.span().start.line,
                error
            );
        }
    }
}

fn process_directory_batch(
    dir_path: &Path,
    config: &batch::BatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Starting batch replay: {}", dir_path.display());
    println!(
        "Configuration: {} threads, recursive={}, fail_fast={}",
        config.max_threads, config.recursive, config.fail_fast
    );

    if let Some(max_files) = config.max_files {
        println!("File limit: {} files maximum", max_files);
    }

    match batch::process_directory_with_config(dir_path, config) {
        Ok(results) => {
            println!();
            print_batch_results(&results);

            if results.failure_count() > 0 {
                std::process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("Batch replay failed: {}", error);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_batch_results(results: &batch::BatchResults) {
    println!("Batch Replay Summary:");
    println!("  Files discovered: {}", results.files_discovered);
    println!("  Files processed: {}", results.files_processed);
    println!(
        "  Successful: {} ({:.1}%)",
        results.success_count(),
        results.success_rate() * 100.0
    );
    println!("  Failed: {}", results.failure_count());
    println!(
        "  Games with replay errors: {}",
        results.games_with_errors()
    );
    println!(
        "  Total time: {:.2}s",
        results.processing_duration.as_secs_f64()
    );

    if results.files_processed > 0 {
        let avg_time = results.processing_duration.as_secs_f64() / results.files_processed as f64;
        println!("  Average time per file: {:.3}s", avg_time);
    }

    if results.failure_count() > 0 {
        println!("\nFailed Files:");
        for (file_path, error) in &results.failed_files {
            println!("  {}: {}", file_path.display(), get_error_summary(error));
        }
    }

    if results.success_count() > 0 && results.success_count() <= 10 {
        println!("\nSuccessful Files:");
        for (file_path, result) in &results.successful_files {
            let (visitor, home) = result.game.final_score();
            println!(
                "  {}: {}-{}, {} states, {} errors",
                file_path.display(),
                visitor,
                home,
                result.game.canonical.len(),
                result.game.errors.len()
            );
        }
    } else if results.success_count() > 10 {
        println!(
            "\n{} files replayed successfully (showing first 5):",
            results.success_count()
        );
        for (file_path, result) in results.successful_files.iter().take(5) {
            let (visitor, home) = result.game.final_score();
            println!(
                "  {}: {}-{}, {} states",
                file_path.display(),
                visitor,
                home,
                result.game.canonical.len()
            );
        }
        println!("  ... and {} more", results.success_count() - 5);
    }
}

fn get_error_summary(error: &pipeline::PipelineError) -> String {
    match error {
        pipeline::PipelineError::FileProcessing(_) => "File processing error".to_string(),
        pipeline::PipelineError::LexicalAnalysis(_) => "Lexical analysis error".to_string(),
        pipeline::PipelineError::GrammarAnalysis(errors) => {
            format!("Grammar analysis error ({} issues)", errors.len())
        }
        pipeline::PipelineError::YamlAnalysis(_) => "YAML analysis error".to_string(),
        pipeline::PipelineError::Pipeline { .. } => "Pipeline error".to_string(),
    }
}

fn print_detailed_error(error: &pipeline::PipelineError) {
    match error {
        pipeline::PipelineError::FileProcessing(file_err) => {
            eprintln!("File processing stage failed:");
            eprintln!("  {}", file_err);
        }
        pipeline::PipelineError::LexicalAnalysis(lex_err) => {
            eprintln!("Lexical analysis stage failed:");
            eprintln!("  {}", lex_err);
        }
        pipeline::PipelineError::GrammarAnalysis(errors) => {
            eprintln!("Grammar analysis stage failed:");
            for grammar_err in errors {
                match grammar_err.span() {
                    Some(span) => eprintln!("  line {}: {}", span.start.line, grammar_err),
                    None => eprintln!("  {}", grammar_err),
                }
            }
        }
        pipeline::PipelineError::YamlAnalysis(yaml_err) => {
            eprintln!("YAML analysis stage failed:");
            eprintln!("  {}", yaml_err);
        }
        pipeline::PipelineError::Pipeline { message } => {
            eprintln!("Pipeline error: {}", message);
        }
    }
}
