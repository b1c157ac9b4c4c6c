use std::io::Write;
use std::process::{Command, Stdio};

use super::{
    MenuRequest, PromptRequest, SelectionOutcome, SelectionSignal, Selector, SelectorError,
};
use crate::config::SelectorConfig;

const EXIT_ACCEPT: i32 = 0;
const EXIT_CANCEL: i32 = 1;
/// rofi exits with 10 for `kb-custom-1`, 11 for `kb-custom-2`, and so on.
const EXIT_CUSTOM_BASE: i32 = 10;

/// [`Selector`] backed by `rofi -dmenu`. Rows are returned by index (`-format i`), so
/// row text never has to be parsed back.
pub struct RofiSelector {
    program: String,
    extra_args: Vec<String>,
}

impl RofiSelector {
    pub fn new(config: &SelectorConfig) -> Self {
        Self {
            program: config.program.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    fn menu_args(&self, request: &MenuRequest) -> Vec<String> {
        let mut args: Vec<String> = ["-dmenu", "-i", "-no-custom", "-format", "i", "-p"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.push(request.title.clone());

        if let Some(selected) = request.selected {
            args.push("-selected-row".to_string());
            args.push(selected.to_string());
        }

        for (n, action) in request.actions.iter().enumerate() {
            args.push(format!("-kb-custom-{}", n + 1));
            args.push(action.key.clone());
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }

    fn prompt_args(&self, request: &PromptRequest) -> Vec<String> {
        let mut args: Vec<String> = ["-dmenu", "-format", "f", "-p"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.push(request.title.clone());
        args.push("-filter".to_string());
        args.push(request.initial.clone());
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Run the launcher with `input` on stdin, returning its exit code and stdout.
    fn run(&self, args: &[String], input: &str) -> Result<(i32, String), SelectorError> {
        tracing::debug!(program = %self.program, ?args, "launching selector");

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SelectorError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let io_error = |source| SelectorError::Io {
            program: self.program.clone(),
            source,
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes()).map_err(io_error)?;
        }

        let output = child.wait_with_output().map_err(io_error)?;
        let code = output
            .status
            .code()
            .ok_or_else(|| SelectorError::Terminated(self.program.clone()))?;
        let stdout = String::from_utf8_lossy(&output.stdout)
            .trim_end_matches('\n')
            .to_string();
        Ok((code, stdout))
    }
}

fn signal_for(code: i32, request: &MenuRequest) -> SelectionSignal {
    match code {
        EXIT_ACCEPT => SelectionSignal::DefaultAccept,
        EXIT_CANCEL => SelectionSignal::Cancel,
        _ => usize::try_from(code - EXIT_CUSTOM_BASE)
            .ok()
            .and_then(|n| request.actions.get(n))
            .map(|action| action.signal)
            .unwrap_or(SelectionSignal::Unrecognized(code)),
    }
}

fn parse_outcome(code: i32, stdout: &str, request: &MenuRequest) -> SelectionOutcome {
    let signal = signal_for(code, request);
    if signal == SelectionSignal::Cancel {
        return SelectionOutcome::cancelled();
    }

    let index = stdout
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|i| *i < request.lines.len());
    let text = index.map(|i| request.lines[i].clone()).unwrap_or_default();

    SelectionOutcome {
        index,
        text,
        signal,
    }
}

impl Selector for RofiSelector {
    fn select(&self, request: &MenuRequest) -> Result<SelectionOutcome, SelectorError> {
        let input = request.lines.join("\n");
        let (code, stdout) = self.run(&self.menu_args(request), &input)?;
        let outcome = parse_outcome(code, &stdout, request);
        tracing::debug!(code, ?outcome, "selection finished");
        Ok(outcome)
    }

    fn prompt(&self, request: &PromptRequest) -> Result<Option<String>, SelectorError> {
        // Offering the current text as the only row lets plain Enter keep it unchanged.
        let (code, stdout) = self.run(&self.prompt_args(request), &request.initial)?;
        match code {
            EXIT_ACCEPT => Ok(Some(stdout)),
            _ => Ok(None),
        }
    }
}
