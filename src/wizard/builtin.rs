//! Built-in commit message formats.

use super::{PromptError, PromptIo, Verdict, Wizard, WizardError};

pub const SIMPLE_ID: &str = "simple-commit-message";
pub const CONVENTIONAL_ID: &str = "conventional-commit-message";

const MAX_HEADER_LEN: usize = 100;

const SIMPLE_TYPES: &[(&str, &str)] = &[
    ("feat", "A new feature"),
    ("fix", "A bug fix"),
    ("chore", "Changes to the build process, tooling or docs"),
    ("major", "A breaking change (major release)"),
    ("break", "A breaking change (alias of major)"),
];

const CONVENTIONAL_TYPES: &[(&str, &str)] = &[
    ("feat", "A new feature"),
    ("fix", "A bug fix"),
    ("docs", "Documentation only changes"),
    ("style", "Formatting, white-space, missing semicolons"),
    ("refactor", "A code change that neither fixes a bug nor adds a feature"),
    ("perf", "A code change that improves performance"),
    ("test", "Adding or correcting tests"),
    ("build", "Changes to the build system or dependencies"),
    ("ci", "Changes to CI configuration and scripts"),
    ("chore", "Other changes that don't modify source or test files"),
    ("revert", "Reverts a previous commit"),
];

/// A parsed `type(scope)!: subject` header line.
#[derive(Debug, PartialEq, Eq)]
struct Header<'a> {
    kind: &'a str,
    scope: Option<&'a str>,
    breaking: bool,
    subject: &'a str,
}

fn parse_header(line: &str) -> Result<Header<'_>, String> {
    let Some((prefix, subject)) = line.split_once(": ") else {
        return Err("expected \"type: subject\" or \"type(scope): subject\"".to_string());
    };

    let (prefix, breaking) = match prefix.strip_suffix('!') {
        Some(rest) => (rest, true),
        None => (prefix, false),
    };

    let (kind, scope) = match prefix.split_once('(') {
        Some((kind, rest)) => {
            let scope = rest
                .strip_suffix(')')
                .ok_or_else(|| format!("unclosed scope in {prefix:?}"))?;
            if scope.is_empty() {
                return Err("scope must not be empty".to_string());
            }
            (kind, Some(scope))
        }
        None => (prefix, None),
    };

    if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(format!("invalid type {kind:?}"));
    }
    if subject.trim().is_empty() {
        return Err("subject must not be empty".to_string());
    }

    Ok(Header {
        kind,
        scope,
        breaking,
        subject,
    })
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

fn type_menu(types: &[(&str, &str)]) -> Vec<String> {
    types
        .iter()
        .map(|(kind, description)| format!("{:<10}{description}", format!("{kind}:")))
        .collect()
}

fn compose_header(kind: &str, scope: &str, subject: &str) -> String {
    let scope = scope.trim();
    if scope.is_empty() {
        format!("{kind}: {subject}")
    } else {
        format!("{kind}({scope}): {subject}")
    }
}

/// `type(scope): subject` with a small set of release-oriented types.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleWizard;

impl Wizard for SimpleWizard {
    fn name(&self) -> &str {
        SIMPLE_ID
    }

    fn validate(&self, message: &str) -> Result<Verdict, WizardError> {
        let header = match parse_header(first_line(message)) {
            Ok(header) => header,
            Err(reason) => return Ok(Verdict::invalid(reason)),
        };
        if !SIMPLE_TYPES.iter().any(|(kind, _)| *kind == header.kind) {
            return Ok(Verdict::invalid(format!(
                "unknown type {:?}, expected one of {}",
                header.kind,
                kinds(SIMPLE_TYPES)
            )));
        }
        if header.breaking {
            return Ok(Verdict::invalid("use the major or break type for breaking changes"));
        }
        Ok(Verdict::Valid)
    }

    fn prompt(&self, io: &mut dyn PromptIo) -> Result<Option<String>, WizardError> {
        let choice = io.select("Select the type of change", &type_menu(SIMPLE_TYPES))?;
        let (kind, _) = SIMPLE_TYPES.get(choice).ok_or(PromptError::Cancelled)?;
        let scope = io.input("Scope of this change (optional)", true)?;
        let subject = io.input("Short description", false)?;

        let subject = subject.trim();
        if subject.is_empty() {
            return Ok(None);
        }
        Ok(Some(compose_header(kind, &scope, subject)))
    }
}

/// Conventional Commits headers with an optional body and footers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConventionalWizard;

impl Wizard for ConventionalWizard {
    fn name(&self) -> &str {
        CONVENTIONAL_ID
    }

    fn validate(&self, message: &str) -> Result<Verdict, WizardError> {
        let line = first_line(message);
        if line.chars().count() > MAX_HEADER_LEN {
            return Ok(Verdict::invalid(format!(
                "header is longer than {MAX_HEADER_LEN} characters"
            )));
        }
        let header = match parse_header(line) {
            Ok(header) => header,
            Err(reason) => return Ok(Verdict::invalid(reason)),
        };
        if !CONVENTIONAL_TYPES.iter().any(|(kind, _)| *kind == header.kind) {
            return Ok(Verdict::invalid(format!(
                "unknown type {:?}, expected one of {}",
                header.kind,
                kinds(CONVENTIONAL_TYPES)
            )));
        }
        if message.lines().nth(1).is_some_and(|second| !second.is_empty()) {
            return Ok(Verdict::invalid("the line after the header must be blank"));
        }
        Ok(Verdict::Valid)
    }

    fn prompt(&self, io: &mut dyn PromptIo) -> Result<Option<String>, WizardError> {
        let choice = io.select(
            "Select the type of change that you're committing",
            &type_menu(CONVENTIONAL_TYPES),
        )?;
        let (kind, _) = CONVENTIONAL_TYPES
            .get(choice)
            .ok_or(PromptError::Cancelled)?;
        let scope = io.input("Denote the scope of this change (optional)", true)?;
        let subject = io.input("Write a short, imperative tense description", false)?;
        let body = io.input(
            "Provide a longer description (optional, use \"|\" to break lines)",
            true,
        )?;
        let breaking = io.input("List any breaking changes (optional)", true)?;
        let issues = io.input("List any issues closed by this change (optional)", true)?;

        let subject = subject.trim();
        if subject.is_empty() {
            return Ok(None);
        }

        let mut sections = vec![compose_header(kind, &scope, subject)];
        let body = body
            .split('|')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if !body.is_empty() {
            sections.push(body);
        }
        let breaking = breaking.trim();
        if !breaking.is_empty() {
            sections.push(format!("BREAKING CHANGE: {breaking}"));
        }
        let issues = issues.trim();
        if !issues.is_empty() {
            sections.push(format!("Closes {issues}"));
        }
        Ok(Some(sections.join("\n\n")))
    }
}

fn kinds(types: &[(&str, &str)]) -> String {
    types
        .iter()
        .map(|(kind, _)| *kind)
        .collect::<Vec<_>>()
        .join(", ")
}
