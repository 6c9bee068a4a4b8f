//! `neru`, the thin control CLI for the daemon.

use std::env;

use neru::ipc::{client, Request, Response, ResponseCode};

fn print_usage() {
    eprintln!("neru - keyboard-driven cursor control");
    eprintln!();
    eprintln!("Usage: neru <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  ping                    Check that the daemon is running");
    eprintln!("  status                  Show enabled state, mode, and config path");
    eprintln!("  enable                  Enable the app");
    eprintln!("  disable                 Disable the app (deactivates any mode)");
    eprintln!("  toggle                  Toggle enabled state");
    eprintln!("  activate <mode>         Activate hints|grid|recursive_grid|scroll");
    eprintln!("  reload-config           Reload the configuration file");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  neru activate hints     # show hint labels");
    eprintln!("  neru toggle             # useful for a launcher binding");
}

fn build_request(args: &[String]) -> Option<Request> {
    let command = args.first().map(String::as_str)?;
    let request = match command {
        "ping" | "status" | "enable" | "disable" | "toggle" => Request::new(command),
        "reload-config" | "reload_config" => Request::new("reload_config"),
        "activate" => {
            let mode = args.get(1)?;
            Request::with_args("activate", vec![mode.clone()])
        }
        _ => return None,
    };
    Some(request)
}

fn print_response(response: &Response) -> i32 {
    if response.success {
        if let Some(data) = &response.data {
            match serde_json::to_string_pretty(data) {
                Ok(pretty) => println!("{pretty}"),
                Err(_) => println!("{data}"),
            }
        } else if let Some(message) = &response.message {
            println!("{message}");
        }
        0
    } else {
        let code = response.code.map(|c| c.as_str()).unwrap_or("error");
        let message = response.message.as_deref().unwrap_or("request failed");
        eprintln!("Error ({code}): {message}");
        1
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() || args[0] == "help" || args[0] == "-h" || args[0] == "--help" {
        print_usage();
        std::process::exit(if args.is_empty() { 1 } else { 0 });
    }

    let Some(request) = build_request(&args) else {
        eprintln!("Unknown command: {}", args.join(" "));
        print_usage();
        std::process::exit(1);
    };

    match client::send(&request).await {
        Ok(response) => std::process::exit(print_response(&response)),
        Err(e) => {
            let response = Response::error(
                ResponseCode::NotRunning,
                format!("failed to reach the daemon (is nerud running?): {e}"),
            );
            std::process::exit(print_response(&response));
        }
    }
}
