// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{bail, Context};
use nebo_app_sdk::prelude::*;
use serde::Deserialize;
use serde_json::Value;

pub const ACTIONS: [&str; 4] = ["add", "subtract", "multiply", "divide"];

#[derive(Debug, Deserialize)]
struct CalcInput {
    action: String,
    a: f64,
    b: f64,
}

/// Four-function arithmetic tool
pub struct Calculator;

#[async_trait]
impl ToolHandler for Calculator {
    fn name(&self) -> String {
        "calculator".to_string()
    }

    fn description(&self) -> String {
        "Performs arithmetic calculations.".to_string()
    }

    fn schema(&self) -> Value {
        ToolSchema::new(ACTIONS)
            .number("a", "First operand", true)
            .number("b", "Second operand", true)
            .build()
    }

    async fn execute(&self, input: ToolInput) -> anyhow::Result<String> {
        let input: CalcInput = input.parse().context("invalid input")?;

        let result = match input.action.as_str() {
            "add" => input.a + input.b,
            "subtract" => input.a - input.b,
            "multiply" => input.a * input.b,
            "divide" => {
                if input.b == 0.0 {
                    bail!("division by zero");
                }
                input.a / input.b
            }
            other => bail!("unknown action: {}", other),
        };

        Ok(format!("{} {} {} = {}", input.a, input.action, input.b, result))
    }
}
