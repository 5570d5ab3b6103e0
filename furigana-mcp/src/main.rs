use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::OnceLock;

use furigana_core::{process_text, OutputStyle, MAX_CHUNK_BYTES};

mod client;
use client::{Config, JlpClient};

// ============ Debug logging ============

fn dbg_enabled() -> bool {
    std::env::var("FURIGANA_DEBUG").ok().as_deref() == Some("1")
}

fn log_path() -> PathBuf {
    if let Ok(p) = std::env::var("FURIGANA_MCP_LOG") {
        return PathBuf::from(p);
    }
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".furigana-mcp.log")
}

fn dbg_log(msg: &str) {
    if !dbg_enabled() {
        return;
    }
    if let Ok(mut f) = std::fs::OpenOptions::new().create(true).append(true).open(log_path()) {
        let _ = writeln!(f, "{}", msg);
    }
}

// ============ MCP stdio framing ============

// Two framing modes, detected from the first inbound message:
// newline-delimited JSON, or LSP-style Content-Length headers.
#[derive(Clone, Copy, PartialEq, Eq)]
enum FramingMode {
    Lsp,
    Lines,
}

static MODE: OnceLock<FramingMode> = OnceLock::new();

fn set_mode(m: FramingMode) {
    let _ = MODE.set(m);
}
fn get_mode() -> FramingMode {
    *MODE.get().unwrap_or(&FramingMode::Lsp)
}

fn read_message(stdin: &mut impl BufRead) -> Result<Option<serde_json::Value>> {
    let mut line = String::new();
    let n = stdin.read_line(&mut line)?;
    if n == 0 {
        return Ok(None);
    }

    if line.trim_start().starts_with('{') {
        set_mode(FramingMode::Lines);
        dbg_log(&format!("[lines] {}", line.trim_end()));
        let v: serde_json::Value = serde_json::from_str(line.trim_end())?;
        return Ok(Some(v));
    }

    // Header block: collect until the blank line, then read the body.
    let mut headers = String::new();
    headers.push_str(&line);
    while !line.trim().is_empty() {
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        headers.push_str(&line);
    }
    set_mode(FramingMode::Lsp);

    let mut content_length = 0usize;
    for h in headers.lines() {
        let h = h.trim();
        if h.to_lowercase().starts_with("content-length:") {
            if let Some(v) = h.split(':').nth(1) {
                content_length = v.trim().parse().unwrap_or(0);
            }
        }
    }
    if content_length == 0 {
        dbg_log("[body] skip len=0");
        return Ok(Some(serde_json::Value::Null));
    }
    let mut content = vec![0u8; content_length];
    stdin.read_exact(&mut content)?;
    dbg_log(&format!("[body-bytes]{}", content_length));
    let v: serde_json::Value = serde_json::from_slice(&content)?;
    Ok(Some(v))
}

fn write_message(stdout: &mut impl Write, v: &serde_json::Value) -> Result<()> {
    match get_mode() {
        FramingMode::Lines => {
            let body = serde_json::to_string(v)?;
            writeln!(stdout, "{}", body)?;
            stdout.flush()?;
            dbg_log(&format!("[send-lines] {} chars", body.len()));
        }
        FramingMode::Lsp => {
            let body = serde_json::to_vec(v)?;
            write!(
                stdout,
                "Content-Length: {}\r\nContent-Type: application/vscode-jsonrpc; charset=utf-8\r\n\r\n",
                body.len()
            )?;
            stdout.write_all(&body)?;
            stdout.flush()?;
            dbg_log(&format!("[send-lsp] {} bytes", body.len()));
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct Request {
    id: serde_json::Value,
    method: String,
    #[serde(default)]
    params: serde_json::Value,
}

// ============ Tool handlers ============

fn handle_initialize(id: serde_json::Value) -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "protocolVersion": "2024-11-05",
            "capabilities": { "tools": {} },
            "serverInfo": { "name": "furigana-mcp", "version": "0.1.0" }
        }
    })
}

fn handle_tools_list(id: serde_json::Value) -> serde_json::Value {
    let furigana = json!({
        "name": "furigana",
        "description": "Attach furigana readings to Japanese text. Long text is split at sentence boundaries and annotated per piece.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Japanese text to annotate" },
                "grade": { "type": "number", "description": "School grade 1-8; kanji up to this grade are left unannotated" },
                "output_format": { "type": "string", "enum": ["brackets", "ruby", "detail"], "description": "Output style (default: brackets)" }
            },
            "required": ["text"]
        }
    });
    json!({"jsonrpc":"2.0","id":id,"result":{"tools":[furigana]}})
}

fn tool_text(id: serde_json::Value, text: String, is_error: bool) -> serde_json::Value {
    let mut result = json!({ "content": [{"type":"text","text": text}] });
    if is_error {
        result["isError"] = json!(true);
    }
    json!({"jsonrpc":"2.0","id":id,"result":result})
}

fn handle_call(api: &JlpClient, id: serde_json::Value, params: &serde_json::Value) -> serde_json::Value {
    let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
    let args = params.get("arguments").cloned().unwrap_or(json!({}));
    match name {
        "furigana" => {
            let text = args.get("text").and_then(|v| v.as_str()).unwrap_or("");
            if text.is_empty() {
                return tool_text(id, "text is required".to_string(), true);
            }
            // Out-of-range grades are treated as absent, not rejected.
            let grade = args
                .get("grade")
                .and_then(|v| v.as_u64())
                .filter(|g| (1..=8).contains(g))
                .map(|g| g as u8);
            let style = OutputStyle::parse(args.get("output_format").and_then(|v| v.as_str()));
            dbg_log(&format!(
                "[furigana] bytes={} grade={:?} style={:?}",
                text.len(),
                grade,
                style
            ));
            match process_text(api, text, grade, style, MAX_CHUNK_BYTES) {
                Ok(out) => tool_text(id, out, false),
                Err(e) => tool_text(id, format!("furigana request failed: {}", e), true),
            }
        }
        _ => tool_text(id, format!("unknown tool: {}", name), true),
    }
}

fn main() -> Result<()> {
    let config = Config::from_env()?;
    let api = JlpClient::new(&config)?;
    eprintln!("[furigana-mcp] ready (chunk limit {} bytes)", MAX_CHUNK_BYTES);

    let stdin = std::io::stdin();
    let mut stdin = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout();
    loop {
        let Some(msg) = read_message(&mut stdin)? else { break };
        if let Ok(req) = serde_json::from_value::<Request>(msg.clone()) {
            dbg_log(&format!("[recv] method={} id={}", req.method, req.id));
            let resp = match req.method.as_str() {
                "initialize" => handle_initialize(req.id),
                "tools/list" => handle_tools_list(req.id),
                "tools/call" => handle_call(&api, req.id, &req.params),
                _ => json!({"jsonrpc":"2.0","id":req.id,"error":{"code": -32601, "message":"Method not found"}}),
            };
            write_message(&mut stdout, &resp)?;
        } else {
            // notifications and other non-requests need no reply
            dbg_log("[recv] non-request/ignored");
        }
    }
    Ok(())
}
