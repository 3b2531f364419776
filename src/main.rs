//! # Weekplate CLI
//!
//! Usage:
//!   weekplate week.json -o report.pdf
//!   echo '{ ... }' | weekplate -o report.pdf
//!   weekplate week.json --metrics
//!   weekplate --example > week.json

use std::env;
use std::fs;
use std::io::{self, Read};

fn main() {
    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_week_json());
        return;
    }

    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).expect("Failed to read stdin");
        buf
    };

    // Parse output path
    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "report.pdf".to_string());

    // Render
    match weekplate::render_json(&input) {
        Ok(report) => {
            fs::write(&output_path, &report.bytes).expect("Failed to write PDF");
            eprintln!(
                "✓ Written {} bytes to {}",
                report.bytes.len(),
                output_path
            );
            if args.iter().any(|a| a == "--metrics") {
                let json = serde_json::to_string_pretty(&report.metrics)
                    .expect("Failed to serialize metrics");
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("✗ Failed to render report: {}", e);
            std::process::exit(1);
        }
    }
}

fn example_week_json() -> &'static str {
    r##"{
  "clientName": "Maria",
  "weekLabel": "Week of Feb 9, 2026",
  "palette": {
    "vegFruit": "#4fa742",
    "healthyCarbs": "#f5d957",
    "protein": "#f59f1a",
    "pauseFood": "#f2899a"
  },
  "days": [
    {
      "label": "Monday",
      "meals": [
        {
          "title": "Oatmeal with berries",
          "breakdown": { "vegFruit": 35, "healthyCarbs": 45, "protein": 15, "pauseFood": 5 },
          "summary": "Rolled oats topped with blueberries and a spoon of almond butter.",
          "adjustmentTips": "Add a boiled egg for more protein."
        },
        {
          "title": "Chicken salad",
          "breakdown": { "vegFruit": 55, "healthyCarbs": 10, "protein": 30, "pauseFood": 5 },
          "summary": "Mixed greens with grilled chicken and olive oil dressing."
        },
        {
          "title": "Pasta night",
          "breakdown": { "vegFruit": 15, "healthyCarbs": 50, "protein": 20, "pauseFood": 15 },
          "summary": "Whole grain penne with tomato sauce and parmesan.",
          "adjustmentTips": "Swap half the pasta for roasted vegetables."
        }
      ]
    },
    {
      "label": "Tuesday",
      "meals": [
        {
          "title": "Greek yogurt bowl",
          "breakdown": { "vegFruit": 30, "healthyCarbs": 20, "protein": 45, "pauseFood": 5 },
          "summary": "Plain yogurt with walnuts, honey, and sliced banana."
        }
      ]
    }
  ]
}"##
}
