use super::BuildStep;
use crate::legacy::Phase;

/// Short run steps for a phase's `pre`, `override` and `post` commands
pub fn phase_steps(phase: &Phase) -> impl Iterator<Item = BuildStep> + '_ {
    phase.commands().map(|command| BuildStep::run(command.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let phase = Phase {
            pre: vec!["a".to_string()],
            r#override: vec!["b".to_string(), "c".to_string()],
            post: vec!["d".to_string()],
        };

        let steps: Vec<BuildStep> = phase_steps(&phase).collect();
        assert_eq!(
            steps,
            vec![
                BuildStep::run("a"),
                BuildStep::run("b"),
                BuildStep::run("c"),
                BuildStep::run("d"),
            ]
        );
    }

    #[test]
    fn test_empty_phase() {
        assert_eq!(phase_steps(&Phase::default()).count(), 0);
    }
}
