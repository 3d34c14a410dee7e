// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bubbleplan_engine::generate::form_data_to_spec;
use bubbleplan_engine::{
    json, share, token, BubbleSpec, ForceComposer, FormData, RoomSlot, RoomType, Simulation,
    ViewCommand, ViewSync,
};

const EXIT_FAILURE: i32 = 1;

macro_rules! die(
    ($($arg:tt)*) => { {
        eprintln!($($arg)*);
        std::process::exit(EXIT_FAILURE)
    } }
);

#[derive(Parser)]
#[command(
    name = "bubbleplan",
    version,
    about = "Generate, lay out, and share apartment bubble diagrams"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a spec from a bedroom count and condition toggles
    Generate {
        /// bedroom count, 1 through 4
        #[arg(long, default_value_t = 2)]
        rooms: u8,
        /// override a room's target area, e.g. --area living=28
        #[arg(long = "area", value_name = "SLOT=M2")]
        areas: Vec<String>,
        /// pull view-suited rooms toward the facade side
        #[arg(long)]
        scenic_view: bool,
        /// push noise-sensitive rooms toward the quiet side
        #[arg(long)]
        noise_control: bool,
        /// strengthen the airflow path through shared spaces
        #[arg(long)]
        ventilation: bool,
    },
    /// Pack a spec JSON file into a URL-safe token
    Encode {
        /// spec JSON path; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Expand a token back into spec JSON
    Decode { token: String },
    /// Settle the force layout and print node positions
    Layout {
        /// spec JSON path; stdin when omitted
        file: Option<PathBuf>,
        /// run exactly this many ticks instead of settling
        #[arg(long)]
        ticks: Option<usize>,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
    },
    /// Print a share URL for a spec
    Share {
        /// spec JSON path; stdin when omitted
        file: Option<PathBuf>,
        #[arg(long, default_value = "https://bubbleplan.app")]
        origin: String,
        #[arg(long, default_value = "/plan")]
        path: String,
        /// include a roomType fallback parameter
        #[arg(long)]
        rooms: Option<u8>,
    },
}

fn read_spec(path: Option<&PathBuf>) -> BubbleSpec {
    let contents = match path {
        Some(p) => fs::read_to_string(p)
            .unwrap_or_else(|err| die!("error reading {}: {}", p.display(), err)),
        None => {
            let mut buf = String::new();
            if let Err(err) = io::stdin().read_to_string(&mut buf) {
                die!("error reading stdin: {}", err);
            }
            buf
        }
    };
    let raw: json::BubbleSpec = serde_json::from_str(&contents)
        .unwrap_or_else(|err| die!("error parsing spec: {}", err));
    match json::validate(&raw) {
        Ok(spec) => spec,
        Err(errors) => die!("invalid spec:\n{}", errors),
    }
}

fn print_spec(spec: &BubbleSpec) {
    let raw = json::BubbleSpec::from(spec);
    match serde_json::to_string_pretty(&raw) {
        Ok(s) => println!("{}", s),
        Err(err) => die!("error serializing spec: {}", err),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            rooms,
            areas,
            scenic_view,
            noise_control,
            ventilation,
        } => {
            let Some(room_type) = RoomType::from_count(rooms) else {
                die!("error: --rooms must be between 1 and 4");
            };
            let mut form = FormData {
                room_type,
                scenic_view,
                noise_control,
                ventilation,
                ..Default::default()
            };
            for pair in &areas {
                let Some((slot_id, value)) = pair.split_once('=') else {
                    die!("error: --area expects SLOT=M2, got '{}'", pair);
                };
                let Some(slot) = RoomSlot::from_id(slot_id) else {
                    die!("error: unknown room slot '{}'", slot_id);
                };
                let area: f64 = value
                    .parse()
                    .unwrap_or_else(|_| die!("error: bad area '{}'", value));
                form.areas.insert(slot, area);
            }
            print_spec(&form_data_to_spec(&form));
        }
        Command::Encode { file } => {
            let spec = read_spec(file.as_ref());
            match token::encode(&spec) {
                Ok(token) => println!("{}", token),
                Err(err) => die!("error encoding spec: {}", err),
            }
        }
        Command::Decode { token } => match token::decode(&token) {
            Ok(spec) => print_spec(&spec),
            Err(err) => die!("error decoding token: {}", err),
        },
        Command::Layout {
            file,
            ticks,
            width,
            height,
        } => {
            let spec = read_spec(file.as_ref());
            let mut sim = Simulation::new();
            let mut composer = ForceComposer::new();
            composer.install(&mut sim, &spec);
            match ticks {
                Some(n) => {
                    for _ in 0..n {
                        sim.tick();
                    }
                }
                None => {
                    sim.settle();
                }
            }

            let mut view = ViewSync::new(width, height);
            view.handle(ViewCommand::Fit, sim.nodes());
            let viewport = view.viewport();

            println!("id\tx\ty\tradius");
            for node in sim.nodes() {
                println!(
                    "{}\t{:.2}\t{:.2}\t{:.2}",
                    node.id, node.x, node.y, node.radius
                );
            }
            println!();
            println!(
                "# viewport: x={:.2} y={:.2} zoom={:.4}",
                viewport.x, viewport.y, viewport.zoom
            );
        }
        Command::Share {
            file,
            origin,
            path,
            rooms,
        } => {
            let spec = read_spec(file.as_ref());
            let room_type = match rooms {
                Some(n) => match RoomType::from_count(n) {
                    Some(rt) => Some(rt),
                    None => die!("error: --rooms must be between 1 and 4"),
                },
                None => None,
            };
            match share::share_url(&origin, &path, &spec, room_type) {
                Ok(url) => println!("{}", url),
                Err(err) => die!("error building share URL: {}", err),
            }
        }
    }
}
