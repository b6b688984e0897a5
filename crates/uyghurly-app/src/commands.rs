use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use uyghurly_account::GoogleCredential;
use uyghurly_core::text::is_correct_answer;
use uyghurly_core::validation::{SignUpForm, password_strength};
use uyghurly_lang_uyghur::UyghurDictionary;
use uyghurly_progress::{FontSize, Theme};
use uyghurly_quiz::{LessonSession, QuizAttempt};
use uyghurly_types::{Unit, UnitQuiz};

use crate::cli::{AccountCommands, AdminCommands, Commands, FontSizeArg, SettingsCommands, ThemeArg};
use crate::controller::AppController;
use crate::state::AppState;

pub async fn dispatch(command: Commands, state: Arc<AppState>) -> anyhow::Result<()> {
    match command {
        Commands::Units => units(&state),
        Commands::Lessons { unit } => lessons(&state, unit.as_deref()),
        Commands::Lesson { slug } => lesson(&state, &slug),
        Commands::Quiz { unit, answers } => quiz(&state, &unit, answers).await,
        Commands::Check { answer, expected } => {
            if is_correct_answer(&answer, &expected) {
                println!("Correct");
            } else {
                println!("Incorrect, expected \"{expected}\"");
            }
            Ok(())
        }
        Commands::Dictionary { term } => dictionary(&state, &term),
        Commands::Progress => progress(&state),
        Commands::Practice { slug } => practice(state, &slug).await,
        Commands::Settings { action } => settings(&state, action),
        Commands::Account { action } => account(&state, action).await,
        Commands::Admin { action } => admin(&state, action).await,
    }
}

fn find_unit<'a>(state: &'a AppState, unit: &str) -> anyhow::Result<&'a Unit> {
    state
        .catalog
        .find_unit(unit)
        .with_context(|| format!("No unit found for \"{unit}\""))
}

fn units(state: &AppState) -> anyhow::Result<()> {
    for unit in state.catalog.units() {
        let lessons = state.catalog.get_lessons_by_unit(&unit.id);
        let quiz = match state.progress.quiz_record(&unit.id)? {
            Some(record) if record.passed => format!("quiz passed ({}%)", record.score),
            Some(record) => format!("quiz {}%", record.score),
            None => "quiz not taken".to_string(),
        };
        println!("{:<12} {:<12} {} lessons, {quiz}", unit.id, unit.title, lessons.len());
    }
    Ok(())
}

fn lessons(state: &AppState, unit: Option<&str>) -> anyhow::Result<()> {
    let lessons = match unit {
        Some(unit) => state.catalog.get_lessons_by_unit(&find_unit(state, unit)?.id),
        None => state.catalog.get_all_lessons().iter().collect(),
    };

    for lesson in lessons {
        let done = if state.progress.tracker().is_lesson_completed(&lesson.slug)? {
            "x"
        } else {
            " "
        };
        println!(
            "[{done}] {:<22} {:<22} {} words",
            lesson.slug,
            lesson.title,
            lesson.vocabulary.len()
        );
    }
    Ok(())
}

fn lesson(state: &AppState, slug: &str) -> anyhow::Result<()> {
    let lesson = state
        .catalog
        .get_lesson_by_slug(slug)
        .with_context(|| format!("Lesson not found: {slug}"))?;

    println!("{} ({})", lesson.title, lesson.unit);
    println!("{}\n", lesson.description);
    for item in &lesson.vocabulary {
        println!("{:<18} {:<24} {}", item.uyghur, item.english, item.definition);
    }
    println!(
        "\n{} exercises, {} typing questions",
        lesson.exercises.len(),
        lesson.typing_questions.len()
    );

    if let Some(status) = state.progress.lesson_status(slug)? {
        println!(
            "Last result: {}/{} on {}",
            status.score,
            status.total_questions,
            status.completed_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

fn print_quiz_header(quiz: &UnitQuiz) {
    println!("{}\n{}", quiz.title, quiz.description);
    match quiz.time_limit {
        Some(minutes) => println!(
            "{} questions, {minutes} minutes, pass with {}%",
            quiz.questions.len(),
            quiz.passing_score
        ),
        None => println!(
            "{} questions, pass with {}%",
            quiz.questions.len(),
            quiz.passing_score
        ),
    }
}

async fn quiz(state: &AppState, unit: &str, answers: Option<Vec<usize>>) -> anyhow::Result<()> {
    let unit = find_unit(state, unit)?;
    let quiz = state.quizzes.get_or_generate(&unit.id, &unit.title)?;
    let mut attempt = QuizAttempt::new(quiz.clone());

    print_quiz_header(&quiz);

    let mut choices: Vec<Option<usize>> = match answers {
        Some(answers) => {
            if answers.len() != quiz.questions.len() {
                bail!(
                    "Expected {} answers, got {}",
                    quiz.questions.len(),
                    answers.len()
                );
            }
            answers.into_iter().map(Some).collect()
        }
        None => vec![None; quiz.questions.len()],
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    for (i, question) in quiz.questions.iter().enumerate() {
        println!("\n{}. {}", i + 1, question.question);
        for (n, option) in question.options.iter().enumerate() {
            println!("  {}. {option}", n + 1);
        }

        let choice = loop {
            if let Some(choice) = choices[i].take() {
                break choice;
            }
            let Some(line) = lines.next_line().await? else {
                bail!("Quiz abandoned");
            };
            match line.trim().parse::<usize>() {
                Ok(n) if (1..=question.options.len()).contains(&n) => break n,
                _ => println!("Enter a number from 1 to {}", question.options.len()),
            }
        };

        let option = question
            .options
            .get(choice.wrapping_sub(1))
            .with_context(|| format!("Question {} has no option {choice}", i + 1))?;
        attempt.select(&question.id, option)?;
    }

    let record = attempt.submit(Utc::now())?;
    state.progress.record_quiz(&unit.id, &record).await?;

    println!(
        "\nScore: {}% ({}/{})",
        record.score, record.correct_answers, record.total_questions
    );
    if record.passed {
        println!("Passed!");
    } else {
        println!("Not passed, {}% needed.", quiz.passing_score);
        for question in &quiz.questions {
            if attempt.answer_for(&question.id) != Some(question.correct_answer.as_str()) {
                if let Some(explanation) = &question.explanation {
                    println!("  - {explanation}");
                }
            }
        }
    }
    Ok(())
}

fn dictionary(state: &AppState, term: &str) -> anyhow::Result<()> {
    let dictionary = UyghurDictionary::from_catalog(&state.catalog);
    let entries = dictionary.search(term);
    if entries.is_empty() {
        println!("No entries match \"{term}\"");
    }
    for entry in entries {
        println!(
            "{:<18} {:<24} {:<10} {}",
            entry.uyghur, entry.english, entry.unit, entry.definition
        );
    }
    Ok(())
}

fn progress(state: &AppState) -> anyhow::Result<()> {
    let summary = state.progress.summary();
    println!(
        "Lessons completed: {}/{} ({}%)",
        summary.lessons_completed,
        summary.total_lessons,
        summary.lessons_percent()
    );
    println!(
        "Units completed:   {}/{} ({}%)",
        summary.units_completed,
        summary.total_units,
        summary.units_percent()
    );
    println!("Words learned:     {}", summary.words_learned);
    println!("Quiz average:      {}%", summary.quiz_average);
    println!("Lessons today:     {}", summary.lessons_today);
    Ok(())
}

async fn practice(state: Arc<AppState>, slug: &str) -> anyhow::Result<()> {
    let lesson = state
        .catalog
        .get_lesson_by_slug(slug)
        .with_context(|| format!("Lesson not found: {slug}"))?;

    let mut rng = match state.config.quiz.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let session = LessonSession::new(lesson, state.config.quiz.lives, &mut rng);
    println!(
        "{}: {} questions, {} lives. Type :q to stop.",
        lesson.title,
        session.total_questions(),
        session.lives()
    );

    let controller = AppController::new(state.clone());
    let mut tasks = controller.spawn_practice(session);

    let mut result = Ok(());
    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = outcome {
            tracing::error!("Practice task failed: {e:#}");
            controller.shutdown();
            if result.is_ok() {
                result = Err(e);
            }
        }
    }
    result
}

fn settings(state: &AppState, action: SettingsCommands) -> anyhow::Result<()> {
    let settings = state.progress.settings();
    match action {
        SettingsCommands::Theme { value: Some(value) } => {
            let theme = match value {
                ThemeArg::Light => Theme::Light,
                ThemeArg::Dark => Theme::Dark,
                ThemeArg::Auto => Theme::Auto,
            };
            settings.set_theme(theme)?;
            println!("Theme set to {theme}");
        }
        SettingsCommands::Theme { value: None } => println!("{}", settings.theme()?),
        SettingsCommands::FontSize { value: Some(value) } => {
            let size = match value {
                FontSizeArg::Small => FontSize::Small,
                FontSizeArg::Medium => FontSize::Medium,
                FontSizeArg::Large => FontSize::Large,
            };
            settings.set_font_size(size)?;
            println!("Font size set to {size}");
        }
        SettingsCommands::FontSize { value: None } => {
            let size = settings.font_size()?;
            println!("{size} ({}px)", size.pixels());
        }
        SettingsCommands::Reset => {
            settings.reset_to_defaults()?;
            println!("Settings reset");
        }
    }
    Ok(())
}

async fn sync_after_sign_in(state: &AppState) {
    match state.progress.reconcile().await {
        Ok(0) => {}
        Ok(n) => println!("Restored {n} quiz results from your account"),
        Err(e) => tracing::warn!("Progress sync failed: {e}"),
    }
}

async fn account(state: &AppState, action: AccountCommands) -> anyhow::Result<()> {
    let accounts = &state.accounts;
    match action {
        AccountCommands::Signup(args) => {
            println!("Password strength: {}", password_strength(&args.password).label);
            let form = SignUpForm {
                name: args.name,
                username: args.username,
                email: args.email,
                confirm_password: args.confirm_password.unwrap_or_else(|| args.password.clone()),
                password: args.password,
            };
            let user = accounts.sign_up(&form).await?;
            println!("Welcome, {}!", user.name);
        }
        AccountCommands::Login(args) => {
            let user = accounts.login(&args.email, &args.password).await?;
            println!("Signed in as {}", user.username);
            sync_after_sign_in(state).await;
        }
        AccountCommands::Google(args) => {
            let credential = GoogleCredential {
                email: args.email,
                display_name: args.name,
            };
            let user = accounts.sign_in_with_google(&credential).await?;
            println!("Signed in as {}", user.username);
            sync_after_sign_in(state).await;
        }
        AccountCommands::Guest => {
            let user = accounts.login_as_guest().await;
            println!("Continuing as {}; progress stays on this device", user.name);
        }
        AccountCommands::Logout => {
            accounts.logout().await;
            println!("Signed out");
        }
        AccountCommands::Whoami => match accounts.current_user().await {
            Some(user) => {
                let kind = if user.is_guest {
                    " (guest)"
                } else if accounts.is_admin().await {
                    " (admin)"
                } else {
                    ""
                };
                println!("{} @{} <{}>{kind}", user.name, user.username, user.email);
                if let Some(doc) = accounts.user_document().await? {
                    println!(
                        "Level {}, {} lessons completed",
                        doc.profile.level, doc.profile.lessons_completed
                    );
                }
            }
            None => println!("Not signed in"),
        },
        AccountCommands::Update(args) => {
            let user = accounts.update_account(&args.name, &args.username).await?;
            println!("Updated: {} @{}", user.name, user.username);
        }
        AccountCommands::Delete => accounts.delete_account().await?,
        AccountCommands::Sync => {
            let restored = state.progress.reconcile().await?;
            println!("Restored {restored} quiz results");
        }
    }
    Ok(())
}

async fn admin(state: &AppState, action: AdminCommands) -> anyhow::Result<()> {
    match action {
        AdminCommands::CompleteLessons => {
            let n = state.progress.complete_all_lessons().await?;
            println!("Marked {n} lessons completed");
        }
        AdminCommands::CompleteQuizzes => {
            let n = state.progress.complete_all_quizzes().await?;
            println!("Marked {n} quizzes passed");
        }
        AdminCommands::Clear => {
            let n = state.progress.clear_progress().await?;
            println!("Cleared {n} progress records");
        }
    }
    Ok(())
}
