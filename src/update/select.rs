//! Choosing which grouped records to update

use super::group::RecordGroup;
use crate::domain::PackageRecord;
use colored::Colorize;
use std::collections::BTreeSet;
use std::io::{BufRead, Write};

/// Picks records out of the update groups
pub trait SelectionStrategy {
    /// Return the chosen records in group order
    fn select<'a>(&mut self, groups: &[RecordGroup<'a>]) -> std::io::Result<Vec<&'a PackageRecord>>;
}

/// Select every grouped record without asking
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoSelect;

impl SelectionStrategy for AutoSelect {
    fn select<'a>(&mut self, groups: &[RecordGroup<'a>]) -> std::io::Result<Vec<&'a PackageRecord>> {
        Ok(groups
            .iter()
            .flat_map(|group| group.records.iter().copied())
            .collect())
    }
}

/// Prompt for a selection on a line-based terminal
pub struct InteractiveSelect<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveSelect<R, W> {
    /// Prompt on `output`, read answers from `input`
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn print_choices(&mut self, groups: &[RecordGroup<'_>]) -> std::io::Result<()> {
        let mut index = 1;
        for group in groups {
            writeln!(
                self.output,
                "\n{} {}",
                group.kind.title().bold(),
                group.kind.description().dimmed()
            )?;
            for record in &group.records {
                writeln!(
                    self.output,
                    "  {:>3}) {:<30} {} {} {}",
                    index,
                    record.module_name,
                    record.installed.as_deref().unwrap_or("-"),
                    "→".dimmed(),
                    record.latest.as_deref().unwrap_or("-").green(),
                )?;
                index += 1;
            }
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> SelectionStrategy for InteractiveSelect<R, W> {
    fn select<'a>(&mut self, groups: &[RecordGroup<'a>]) -> std::io::Result<Vec<&'a PackageRecord>> {
        let choices: Vec<&'a PackageRecord> = AutoSelect.select(groups)?;
        if choices.is_empty() {
            return Ok(Vec::new());
        }

        self.print_choices(groups)?;

        loop {
            write!(
                self.output,
                "\nChoose which packages to update (e.g. 1,3-5; 'a' for all; empty for none): "
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(Vec::new());
            }

            match parse_selection(&line, choices.len()) {
                Ok(indices) => return Ok(indices.into_iter().map(|i| choices[i]).collect()),
                Err(message) => writeln!(self.output, "{}", message.red())?,
            }
        }
    }
}

/// Parse "1,3-5", "a" or "" into zero-based indices, sorted and unique
fn parse_selection(line: &str, count: usize) -> Result<Vec<usize>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }
    if line.eq_ignore_ascii_case("a") || line.eq_ignore_ascii_case("all") {
        return Ok((0..count).collect());
    }

    let number = |s: &str| -> Result<usize, String> {
        match s.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
            _ => Err(format!("'{}' is not a number between 1 and {}", s.trim(), count)),
        }
    };

    let mut picked = BTreeSet::new();
    for token in line.split([',', ' ']).filter(|t| !t.trim().is_empty()) {
        match token.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (number(start)?, number(end)?);
                if start > end {
                    return Err(format!("'{}' is not an ascending range", token.trim()));
                }
                picked.extend(start..=end);
            }
            None => {
                picked.insert(number(token)?);
            }
        }
    }
    Ok(picked.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BumpClass;
    use crate::update::group::group_records;
    use std::io::Cursor;

    fn records() -> Vec<PackageRecord> {
        ["a", "b", "c"]
            .iter()
            .map(|name| {
                let mut r = PackageRecord::new(*name, true);
                r.latest = Some("2.0.0".to_string());
                r.installed = Some("1.0.0".to_string());
                r.bump = Some(BumpClass::Major);
                r
            })
            .collect()
    }

    fn names(selected: &[&PackageRecord]) -> Vec<String> {
        selected.iter().map(|r| r.module_name.clone()).collect()
    }

    #[test]
    fn test_auto_select_takes_everything() {
        let records = records();
        let groups = group_records(&records);
        let selected = AutoSelect.select(&groups).unwrap();
        assert_eq!(names(&selected), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_interactive_select_numbers() {
        let records = records();
        let groups = group_records(&records);
        let mut output = Vec::new();
        let mut strategy = InteractiveSelect::new(Cursor::new("1,3\n"), &mut output);
        let selected = strategy.select(&groups).unwrap();
        assert_eq!(names(&selected), vec!["a", "c"]);
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Potentially breaking API changes"));
    }

    #[test]
    fn test_interactive_select_all_and_none() {
        let records = records();
        let groups = group_records(&records);

        let mut strategy = InteractiveSelect::new(Cursor::new("a\n"), Vec::new());
        assert_eq!(strategy.select(&groups).unwrap().len(), 3);

        let mut strategy = InteractiveSelect::new(Cursor::new("\n"), Vec::new());
        assert!(strategy.select(&groups).unwrap().is_empty());

        let mut strategy = InteractiveSelect::new(Cursor::new(""), Vec::new());
        assert!(strategy.select(&groups).unwrap().is_empty());
    }

    #[test]
    fn test_interactive_select_reprompts_on_bad_input() {
        let records = records();
        let groups = group_records(&records);
        let mut output = Vec::new();
        let mut strategy = InteractiveSelect::new(Cursor::new("9\n2\n"), &mut output);
        let selected = strategy.select(&groups).unwrap();
        assert_eq!(names(&selected), vec!["b"]);
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("not a number between 1 and 3"));
    }

    #[test]
    fn test_parse_selection_ranges() {
        assert_eq!(parse_selection("1-3", 5), Ok(vec![0, 1, 2]));
        assert_eq!(parse_selection("2, 1 2", 5), Ok(vec![0, 1]));
        assert!(parse_selection("3-1", 5).is_err());
        assert!(parse_selection("x", 5).is_err());
        assert!(parse_selection("0", 5).is_err());
    }
}
