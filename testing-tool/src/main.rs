use anyhow::{Context, Result};
use colored::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::{self, Write};

#[derive(Debug, Deserialize)]
struct ToolParameter {
    name: String,
    param_type: String,
    description: String,
    required: bool,
}

#[derive(Debug, Deserialize)]
struct ToolMetadata {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚗 Fleet Demand Tool Console".bright_blue().bold());
    println!("{}", "=============================".bright_blue());

    let base_url = std::env::var("FLEET_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let client = reqwest::Client::new();
    println!("{} {}", "🌐 API:".bright_blue(), base_url);

    let tools: Vec<ToolMetadata> = client
        .get(format!("{}/api/tools", base_url))
        .send()
        .await
        .context("could not reach the API, is the server running?")?
        .error_for_status()?
        .json()
        .await?;

    loop {
        println!();
        println!("{}", "📋 TOOLS".bright_green().bold());
        println!("{}", "========".bright_green());
        for (i, tool) in tools.iter().enumerate() {
            println!("{}. {} - {}", i + 1, tool.name.bright_white().bold(), tool.description);
        }
        println!("{}. 🚪 Salir", tools.len() + 1);

        let choice = prompt(&format!("Selecciona una opción (1-{}): ", tools.len() + 1))?;
        let index = match choice.parse::<usize>() {
            Ok(n) if (1..=tools.len()).contains(&n) => n - 1,
            Ok(n) if n == tools.len() + 1 => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                continue;
            }
        };

        let tool = &tools[index];
        let args = read_arguments(tool)?;
        call_tool(&client, &base_url, &tool.name, &args).await?;
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Pedir cada parámetro; vacío = omitido
fn read_arguments(tool: &ToolMetadata) -> Result<Value> {
    println!();
    println!("{}", format!("🔧 {}", tool.name).bright_cyan().bold());

    let mut args = Map::new();
    for parameter in &tool.parameters {
        let marker = if parameter.required { "*" } else { "" };
        let raw = prompt(&format!(
            "{}{} ({}) - {}: ",
            parameter.name, marker, parameter.param_type, parameter.description
        ))?;
        if raw.is_empty() {
            continue;
        }

        let value = match parameter.param_type.as_str() {
            "integer" => raw.parse::<i64>().map(Value::from).unwrap_or(Value::String(raw)),
            _ => Value::String(raw),
        };
        args.insert(parameter.name.clone(), value);
    }
    Ok(Value::Object(args))
}

async fn call_tool(client: &reqwest::Client, base_url: &str, name: &str, args: &Value) -> Result<()> {
    println!();
    println!("{}", "📦 Payload:".bright_blue());
    println!("{}", serde_json::to_string_pretty(args)?);

    let response = client
        .post(format!("{}/api/tools/{}", base_url, name))
        .json(args)
        .send()
        .await?;
    let status = response.status();
    let body: Value = response.json().await?;

    println!();
    println!("{}", format!("📥 RESPUESTA ({})", status).bright_green().bold());
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        println!("{} {}", "⚠️".bright_yellow(), error.bright_red());
    }
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
