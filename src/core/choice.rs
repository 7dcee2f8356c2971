use crate::domain::model::DestinationList;
use std::collections::BTreeMap;

/// What the user asked for on one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// File the venue into the list with this identifier.
    Proceed(String),
    Skip,
    Quit,
    RetryInput(InputProblem),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputProblem {
    NotANumber,
    OutOfRange(i64),
}

impl InputProblem {
    pub fn guidance(&self) -> &'static str {
        match self {
            InputProblem::NotANumber => {
                "Your choice was neither skip nor a valid number. Please re-enter your choice."
            }
            InputProblem::OutOfRange(_) => {
                "Your choice was not in the range of valid choices. Please re-enter your choice."
            }
        }
    }
}

/// 1-based ordinals mapped to destination lists, fixed for a run.
#[derive(Debug, Clone)]
pub struct ChoiceMenu {
    entries: BTreeMap<i64, DestinationList>,
}

impl ChoiceMenu {
    pub fn new(lists: Vec<DestinationList>) -> Self {
        let entries = (1..).zip(lists).collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, choice: i64) -> Option<&DestinationList> {
        self.entries.get(&choice)
    }

    /// Name of the destination with this identifier, for messages.
    pub fn name_of(&self, list_id: &str) -> Option<&str> {
        self.entries
            .values()
            .find(|l| l.id == list_id)
            .map(|l| l.name.as_str())
    }

    /// One `"{n}) {name}"` line per entry.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(choice, list)| format!("{}) {}", choice, list.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn parse(&self, input: &str) -> Decision {
        let input = input.trim();
        let lowered = input.to_lowercase();

        if input.is_empty() || lowered.starts_with('s') {
            return Decision::Skip;
        }
        if lowered.starts_with('q') {
            return Decision::Quit;
        }

        match input.parse::<i64>() {
            Err(_) => Decision::RetryInput(InputProblem::NotANumber),
            Ok(choice) => match self.get(choice) {
                Some(list) => Decision::Proceed(list.id.clone()),
                None => Decision::RetryInput(InputProblem::OutOfRange(choice)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> ChoiceMenu {
        ChoiceMenu::new(vec![
            DestinationList {
                id: "list-a".to_string(),
                name: "A".to_string(),
            },
            DestinationList {
                id: "list-b".to_string(),
                name: "B".to_string(),
            },
        ])
    }

    #[test]
    fn test_skip_inputs() {
        let menu = menu();
        assert_eq!(menu.parse(""), Decision::Skip);
        assert_eq!(menu.parse("skip"), Decision::Skip);
        assert_eq!(menu.parse("S"), Decision::Skip);
        assert_eq!(menu.parse("\n"), Decision::Skip);
    }

    #[test]
    fn test_quit_inputs() {
        let menu = menu();
        assert_eq!(menu.parse("q"), Decision::Quit);
        assert_eq!(menu.parse("Quit"), Decision::Quit);
    }

    #[test]
    fn test_valid_ordinal_maps_to_list_id() {
        assert_eq!(menu().parse("2"), Decision::Proceed("list-b".to_string()));
        assert_eq!(menu().parse(" 1 \n"), Decision::Proceed("list-a".to_string()));
    }

    #[test]
    fn test_invalid_inputs_ask_for_retry() {
        let menu = menu();
        assert_eq!(
            menu.parse("5"),
            Decision::RetryInput(InputProblem::OutOfRange(5))
        );
        assert_eq!(
            menu.parse("0"),
            Decision::RetryInput(InputProblem::OutOfRange(0))
        );
        assert_eq!(
            menu.parse("abc"),
            Decision::RetryInput(InputProblem::NotANumber)
        );
    }

    #[test]
    fn test_render_lists_ordinals_in_order() {
        assert_eq!(menu().render(), "1) A\n2) B");
        assert_eq!(menu().name_of("list-b"), Some("B"));
    }
}
