use std::path::PathBuf;
use std::sync::atomic::Ordering;

use souk::logger::{sanitize_filename, ConsoleReceiver, FileReceiver, LogEvent, Logger};
use souk::scenarios::get_scenario_catalog;
use souk::utils::{RAND_SEED, VERBOSE_ALLOCATION};
use souk::{charts, log, logln, scenarios};

fn main() {
    let raw_args: Vec<String> = std::env::args().collect();

    // Parse and filter out the --verbose argument
    let mut args = Vec::new();
    let mut skip_next = false;
    for (i, arg) in raw_args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--verbose" {
            if i + 1 < raw_args.len() && raw_args[i + 1] == "allocation" {
                VERBOSE_ALLOCATION.store(true, Ordering::Relaxed);
                skip_next = true;
            }
            continue;
        }
        args.push(arg.clone());
    }

    // Check if "charts" argument is provided
    if args.len() > 1 && args[1] == "charts" {
        match charts::generate_comparison_charts() {
            Ok(()) => {
                println!("Chart generation completed successfully.");
            }
            Err(e) => {
                eprintln!("Error generating charts: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if args.len() > 1 {
        let scenario_arg = &args[1];

        // Parse iterations parameter if present
        let iterations = if args.len() > 2 {
            match args[2].parse::<u64>() {
                Ok(n) => n,
                Err(_) => {
                    eprintln!("Error: Invalid iterations parameter '{}'. Expected a number.", args[2]);
                    std::process::exit(1);
                }
            }
        } else {
            1
        };

        // Get all scenarios from the catalog
        let all_scenarios = get_scenario_catalog();

        // Filter scenarios: if "all", use all scenarios; otherwise filter to the named scenario
        let scenarios_to_run: Vec<_> = if scenario_arg == "all" {
            all_scenarios.clone()
        } else {
            let found = all_scenarios.iter().find(|s| s.short_name == scenario_arg);
            match found {
                Some(scenario) => vec![scenario.clone()],
                None => {
                    eprintln!("Error: Scenario '{}' not found.", scenario_arg);
                    eprintln!("Available scenarios:");
                    for s in &all_scenarios {
                        eprintln!("  - {}", s.short_name);
                    }
                    std::process::exit(1);
                }
            }
        };

        // Set up logger with console and validation file receivers
        // When running a specific scenario (not "all"), also show individual validations
        let mut logger = Logger::new();
        if scenario_arg == "all" {
            logger.add_receiver(ConsoleReceiver::new(vec![LogEvent::Validation]));
        } else {
            logger.add_receiver(ConsoleReceiver::new(vec![LogEvent::Validation, LogEvent::Scenario]));
        }

        // Add validation receiver (for validation events)
        let summary_receiver_id = logger.add_receiver(FileReceiver::new(
            &PathBuf::from("log/summary.log"),
            vec![LogEvent::Validation],
        ));

        if scenario_arg == "all" {
            if iterations > 1 {
                logln!(&mut logger, LogEvent::Validation, "Running all scenarios {} times...\n", iterations);
            } else {
                logln!(&mut logger, LogEvent::Validation, "Running all scenarios...\n");
            }
        } else if iterations > 1 {
            logln!(&mut logger, LogEvent::Validation, "Running scenario '{}' {} times...\n", scenario_arg, iterations);
        } else {
            logln!(&mut logger, LogEvent::Validation, "Running scenario '{}'...\n", scenario_arg);
        }

        // Outer loop for scenarios
        for scenario in &scenarios_to_run {
            log!(&mut logger, LogEvent::Validation, "{}: ", scenario.short_name);

            // Add scenario-level receiver
            let scenario_receiver_id = logger.add_receiver(FileReceiver::new(
                &PathBuf::from(format!("log/{}/scenario.log", sanitize_filename(scenario.short_name))),
                vec![LogEvent::Scenario],
            ));

            // Inner loop for iterations
            for i in 0..iterations {
                if iterations > 1 {
                    log!(&mut logger, LogEvent::Validation, "[{}/{}] ", i + 1, iterations);
                }

                // Set RAND_SEED to iteration number
                RAND_SEED.store(i, Ordering::Relaxed);

                match (scenario.run)(scenario.short_name, &mut logger) {
                    Ok(()) => {
                        if iterations > 1 {
                            logln!(&mut logger, LogEvent::Validation, "✓");
                        } else {
                            logln!(&mut logger, LogEvent::Validation, "✓ PASSED");
                        }
                    }
                    Err(e) => {
                        if iterations > 1 {
                            logln!(&mut logger, LogEvent::Validation, "✗");
                        } else {
                            logln!(&mut logger, LogEvent::Validation, "✗ FAILED: {}", e);
                        }
                    }
                }

                // Flush to ensure validation is written to summary.log
                let _ = logger.flush();
            }

            // Remove scenario-level receiver
            logger.remove_receiver(scenario_receiver_id);
        }

        // Remove validation receiver
        logger.remove_receiver(summary_receiver_id);
    } else {
        // Default behavior: run the balanced market scenario with run-level
        // console output
        let mut logger = Logger::new();
        logger.add_receiver(ConsoleReceiver::new(vec![
            LogEvent::Run,
            LogEvent::Scenario,
            LogEvent::Validation,
        ]));
        if let Err(e) = scenarios::balanced_market::run("balanced_market", &mut logger) {
            eprintln!("Error running scenario: {}", e);
            std::process::exit(1);
        }
    }
}
