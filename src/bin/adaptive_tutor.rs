//! Adaptive tutoring demo: learn which question difficulty to offer a
//! simulated student at each skill level, then print the learned policy
//! table and a greedy demonstration run.

use std::{error::Error, fs, path::Path};

use rand::{rngs::StdRng, SeedableRng};

use qlearn::{
    algo::tabular::q_table::{QTable, QTableAgent, QTableAgentConfig},
    decay,
    env::{Environment, Exp},
    eval::greedy_rollout,
    exploration::EpsilonGreedy,
    gym::{
        student::{Difficulty, Skill},
        Student,
    },
    trainer::{Trainer, TrainerConfig},
};

const TRAIN_SEED: u64 = 42;
const DEMO_SEED: u64 = 7;
const DEMO_STEPS: usize = 20;

type TutorTable = QTable<Skill, Difficulty>;

fn policy_table_lines(env: &Student, q_table: &TutorTable) -> Vec<String> {
    let actions = env.actions();
    let mut lines = vec!["=== LEARNED POLICY TABLE ===".to_string()];
    for skill in env.skill_levels() {
        let best = q_table.best_action(skill, &actions);
        let values = actions
            .iter()
            .map(|&a| format!("{}={:+.2}", a, q_table.get(skill, a)))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("skill {skill}: best={best} | {values}"));
    }
    lines
}

fn demo_lines(env: &Student, trace: &[Exp<Student>]) -> Vec<String> {
    let mut lines = vec!["=== DEMO RUN (greedy learned policy) ===".to_string()];
    lines.extend(trace.iter().enumerate().map(|(i, exp)| {
        format!(
            "step {i:02} | skill={} | pick={:>6} | reward={:+.2} | next_skill={}",
            exp.state,
            exp.action.to_string(),
            exp.reward,
            exp.next_state
        )
    }));

    if let Some(last) = trace.last() {
        if last.next_state >= env.max_skill() {
            lines.push(format!(
                "DONE: student reached skill level {}",
                env.max_skill()
            ));
        }
    }

    lines
}

fn main() -> Result<(), Box<dyn Error>> {
    let env = Student::default();
    let mut rng = StdRng::seed_from_u64(TRAIN_SEED);
    let mut agent = QTableAgent::new(QTableAgentConfig {
        exploration: EpsilonGreedy::new(decay::Multiplicative::new(0.997, 1.0, 0.05)?),
        alpha: 0.25,
        gamma: 0.95,
        max_steps_per_episode: 25,
    });

    let summary = Trainer::new(TrainerConfig {
        episodes: 4000,
        window: 200,
        progress_every: 500,
    })
    .train(&mut agent, &env, &mut rng);

    let bar = "=".repeat(70);
    let mut out = vec![
        bar.clone(),
        "Adaptive Learning RL (Q-Learning Tutor)".to_string(),
        bar,
        format!("Training metrics: {summary}"),
        String::new(),
    ];

    out.push("=== TRAINING LOG (every 500 episodes) ===".to_string());
    out.extend(
        summary
            .progress
            .iter()
            .map(|p| format!("episode={:04} eps={:.3}", p.episode, p.epsilon)),
    );
    out.push(String::new());

    out.extend(policy_table_lines(&env, agent.q_table()));
    out.push(String::new());

    let mut demo_rng = StdRng::seed_from_u64(DEMO_SEED);
    out.extend(demo_lines(
        &env,
        &greedy_rollout(&env, agent.q_table(), DEMO_STEPS, &mut demo_rng),
    ));

    let text = out.join("\n");
    println!("{text}");

    let models = Path::new("models");
    fs::create_dir_all(models)?;
    let log_path = models.join("adaptive_tutor_log.txt");
    fs::write(&log_path, &text)?;

    println!("\nSaved proof log to: {}", log_path.display());
    Ok(())
}
