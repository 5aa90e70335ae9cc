use crate::cli::opts::*;
use crate::translate::run_translation;

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use idiomaster_core::{
    clear_test_date, current_date, filter_by_level, filter_by_tag, filter_by_text, is_pro,
    is_unlocked, open_progress, passed, percentage, questions_for_idiom, questions_for_level,
    save_progress, set_pro, set_test_date, summarize, todays_idiom, Catalog, Idiom, Lang, Level,
    Milestone, PrefsStore, ProgressState, QuestionBank, QuizQuestion, UnlockCache, FREE_LEVELS,
    PASS_PERCENT,
};
use idiomaster_json::content::{load_catalog, load_question_bank};
use idiomaster_json::JsonPrefs;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run_cli(args: Cli) -> Result<()> {
    let prefs = open_prefs(args.data_dir.clone()).await?;
    let catalog = load_catalog(args.catalog.as_deref());
    let lang = if args.english { Lang::English } else { Lang::Native };

    match args.cmd.clone() {
        Command::Today => today_cmd(prefs.as_ref(), &catalog).await,
        Command::List(a) => list_cmd(prefs.as_ref(), &catalog, a).await,
        Command::View { idiom_id } => view_cmd(prefs.as_ref(), &catalog, &idiom_id).await,
        Command::Quiz(cmd) => {
            let bank = load_question_bank(args.questions.as_deref());
            quiz_cmd(prefs.as_ref(), &catalog, &bank, lang, cmd).await
        }
        Command::Fav(cmd) => fav_cmd(prefs.as_ref(), &catalog, cmd).await,
        Command::Stats => stats_cmd(prefs.as_ref(), &catalog).await,
        Command::Pro(cmd) => pro_cmd(prefs.as_ref(), cmd).await,
        Command::Translate(a) => run_translation(&catalog, &a.text, a.delay_ms).await,
        Command::Dev(cmd) => dev_cmd(prefs.as_ref(), cmd).await,
    }
}

pub async fn open_prefs(data_dir: Option<PathBuf>) -> Result<Arc<dyn PrefsStore>> {
    let file = match data_dir {
        Some(dir) => dir.join("prefs.json"),
        None => idiomaster_json::paths::default_prefs_file(),
    };
    let store = JsonPrefs::open(file).await?;
    Ok(Arc::new(store))
}

async fn today_cmd(prefs: &dyn PrefsStore, catalog: &Catalog) -> Result<()> {
    let now = current_date(prefs).await;
    let pro = is_pro(prefs).await;
    let mut progress = open_progress(prefs, now).await?;

    let idiom = todays_idiom(catalog, &progress, pro, now);

    // The daily pick counts as a view only on first sight; repeat runs on
    // the same day stay silent.
    let mut fired = Vec::new();
    if !progress.has_viewed(&idiom.id) {
        fired = progress.record_view(idiom.id.clone(), now);
    }
    progress.add_to_daily_rotation(idiom.id.clone());
    save_progress(prefs, &progress).await?;

    println!("Today's idiom ({})", now.format("%Y-%m-%d"));
    print_idiom(idiom, &progress);
    for milestone in fired {
        print_milestone(milestone);
    }
    Ok(())
}

async fn list_cmd(prefs: &dyn PrefsStore, catalog: &Catalog, args: ListArgs) -> Result<()> {
    let now = current_date(prefs).await;
    let pro = is_pro(prefs).await;
    let progress = open_progress(prefs, now).await?;

    let mut idioms = catalog.idioms().to_vec();
    if let Some(level) = args.level {
        let level: Level = level.parse()?;
        idioms = filter_by_level(&idioms, level);
    }
    if let Some(tag) = args.tag {
        idioms = filter_by_tag(&idioms, &tag);
    }
    if let Some(query) = args.search {
        idioms = filter_by_text(&idioms, &query);
    }

    if idioms.is_empty() {
        println!("no idioms match");
        return Ok(());
    }

    let mut cache = UnlockCache::new();
    for idiom in &idioms {
        let unlocked = cache.check(idiom, &progress, pro);
        println!(
            "{}\t{}\t{}\tstatus={}\tpremium={}\tlearned={}\tfavorite={}",
            idiom.id,
            idiom.level,
            idiom.title,
            if unlocked { "unlocked" } else { "locked" },
            idiom.is_premium,
            progress.has_learned(&idiom.id),
            progress.is_favorite(&idiom.id),
        );
    }
    Ok(())
}

async fn view_cmd(prefs: &dyn PrefsStore, catalog: &Catalog, idiom_id: &str) -> Result<()> {
    let now = current_date(prefs).await;
    let pro = is_pro(prefs).await;
    let mut progress = open_progress(prefs, now).await?;

    let idiom = resolve_idiom(catalog, idiom_id)?;
    ensure_unlocked(idiom, &progress, pro)?;

    // Every successful detail view counts, repeat visits included.
    let fired = progress.record_view(idiom.id.clone(), now);
    save_progress(prefs, &progress).await?;

    print_idiom(idiom, &progress);
    for milestone in fired {
        print_milestone(milestone);
    }
    Ok(())
}

async fn quiz_cmd(
    prefs: &dyn PrefsStore,
    catalog: &Catalog,
    bank: &QuestionBank,
    lang: Lang,
    cmd: QuizCmd,
) -> Result<()> {
    let now = current_date(prefs).await;
    let pro = is_pro(prefs).await;
    let mut progress = open_progress(prefs, now).await?;
    let mut rng = rand::thread_rng();

    match cmd {
        QuizCmd::Idiom { idiom_id } => {
            let idiom = resolve_idiom(catalog, &idiom_id)?;
            ensure_unlocked(idiom, &progress, pro)?;
            let questions = questions_for_idiom(bank, catalog, idiom, lang, &mut rng);
            if questions.is_empty() {
                bail!("no quiz material for '{}'", idiom.title);
            }
            let (score, total) = run_quiz_loop(&questions)?;
            println!("\nscore: {}/{} ({:.0}%)", score, total, percentage(score, total));
            if passed(score, total) {
                if progress.record_learned(idiom.id.clone(), now) {
                    println!("'{}' marked as learned", idiom.title);
                } else {
                    println!("'{}' was already learned", idiom.title);
                }
            } else {
                progress.record_quiz_completed(now);
                println!("below {PASS_PERCENT:.0}% - not learned yet, try again");
            }
            save_progress(prefs, &progress).await?;
        }
        QuizCmd::Level { level } => {
            let level: Level = level.parse()?;
            if !pro && !FREE_LEVELS.contains(&level) {
                bail!("level {level} quizzes need the Pro plan (idiomaster pro on)");
            }
            let questions = questions_for_level(bank, catalog, level, lang, &mut rng);
            if questions.is_empty() {
                bail!("no idioms at level {level}");
            }
            let (score, total) = run_quiz_loop(&questions)?;
            println!("\nscore: {}/{} ({:.0}%)", score, total, percentage(score, total));
            progress.record_quiz_completed(now);
            save_progress(prefs, &progress).await?;
        }
    }
    Ok(())
}

fn run_quiz_loop(questions: &[QuizQuestion]) -> Result<(usize, usize)> {
    let mut score = 0usize;
    for (i, question) in questions.iter().enumerate() {
        println!("\n[{}/{}] {}", i + 1, questions.len(), question.prompt);
        for (n, option) in question.options.iter().enumerate() {
            println!("  {}) {}", n + 1, option);
        }
        let picked = loop {
            let line = read_line("answer> ")?;
            let t = line.trim();
            if t.eq_ignore_ascii_case("q") || t.eq_ignore_ascii_case("quit") {
                bail!("quiz aborted");
            }
            match t.parse::<usize>() {
                Ok(n) if n >= 1 && n <= question.options.len() => break n - 1,
                _ => println!("enter 1-{}, or q to quit", question.options.len()),
            }
        };
        if picked == question.answer {
            score += 1;
            println!("correct");
        } else {
            println!("wrong - answer: {}", question.options[question.answer]);
        }
    }
    Ok((score, questions.len()))
}

async fn fav_cmd(prefs: &dyn PrefsStore, catalog: &Catalog, cmd: FavCmd) -> Result<()> {
    let now = current_date(prefs).await;
    let mut progress = open_progress(prefs, now).await?;
    match cmd {
        FavCmd::Add { idiom_id } => {
            let idiom = resolve_idiom(catalog, &idiom_id)?;
            if progress.add_favorite(idiom.id.clone(), now) {
                println!("added '{}'", idiom.title);
            } else {
                println!("'{}' is already a favorite", idiom.title);
            }
            save_progress(prefs, &progress).await?;
        }
        FavCmd::Rm { idiom_id } => {
            // Favorites may point at ids no longer in the catalog, so a
            // failed resolve still removes by the raw argument.
            let id = match resolve_idiom(catalog, &idiom_id) {
                Ok(idiom) => idiom.id.clone(),
                Err(_) => idiom_id,
            };
            if progress.remove_favorite(&id) {
                println!("removed");
            } else {
                println!("not a favorite");
            }
            save_progress(prefs, &progress).await?;
        }
        FavCmd::List => {
            if progress.favorites.is_empty() {
                println!("no favorites yet");
                return Ok(());
            }
            for id in &progress.favorites {
                match catalog.get(id) {
                    Some(idiom) => println!("{}\t{}\t{}", idiom.id, idiom.level, idiom.title),
                    None => println!("{id}\t?\t(not in catalog)"),
                }
            }
        }
        FavCmd::Clear => {
            let n = progress.favorites.len();
            progress.clear_favorites();
            save_progress(prefs, &progress).await?;
            println!("cleared {n} favorite(s)");
        }
    }
    Ok(())
}

async fn stats_cmd(prefs: &dyn PrefsStore, catalog: &Catalog) -> Result<()> {
    let now = current_date(prefs).await;
    let pro = is_pro(prefs).await;
    let progress = open_progress(prefs, now).await?;
    let summary = summarize(&progress, catalog, now);

    println!("plan:          {}", if pro { "Pro" } else { "Free" });
    println!("level:         {}", summary.user_level);
    println!(
        "idioms viewed: {} ({} unique)",
        summary.idioms_viewed, summary.unique_viewed
    );
    println!("learned:       {}", summary.learned);
    println!("quizzes:       {}", summary.quizzes_completed);
    println!("favorites:     {}", summary.favorites);
    println!("streak:        {} day(s)", summary.streak_days);
    println!("avg/day:       {:.2}", summary.average_per_day);
    println!("efficiency:    {:.2}", summary.learning_efficiency);
    println!(
        "milestones:    5 views {}  10 views {}  20 views {}",
        mark(progress.milestone_reached(Milestone::FiveViews)),
        mark(progress.milestone_reached(Milestone::TenViews)),
        mark(progress.milestone_reached(Milestone::TwentyViews)),
    );
    for lp in &summary.per_level {
        println!(
            "  {}: {}/{} learned ({:.0}%)",
            lp.level,
            lp.learned,
            lp.total,
            lp.ratio() * 100.0
        );
    }
    if summary.is_active_learner() {
        println!("status:        active learner");
    } else if summary.should_show_encouragement() {
        println!("status:        just a few minutes a day keeps the streak alive");
    }
    Ok(())
}

async fn pro_cmd(prefs: &dyn PrefsStore, cmd: ProCmd) -> Result<()> {
    match cmd {
        ProCmd::On => {
            set_pro(prefs, true).await?;
            println!("Pro enabled (mock subscription, no billing attached)");
        }
        ProCmd::Off => {
            set_pro(prefs, false).await?;
            println!("Pro disabled");
        }
    }
    Ok(())
}

async fn dev_cmd(prefs: &dyn PrefsStore, cmd: DevCmd) -> Result<()> {
    match cmd {
        DevCmd::SetDate { date } => {
            let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|_| anyhow!("expected YYYY-MM-DD"))?;
            // Pinned to noon, mid-day of the chosen date.
            let pinned = day.and_hms_opt(12, 0, 0).expect("valid time").and_utc();
            set_test_date(prefs, pinned).await?;
            println!("test date pinned to {day}");
        }
        DevCmd::ClearDate => {
            clear_test_date(prefs).await?;
            println!("test date cleared");
        }
        DevCmd::Reset => {
            let line = read_line("wipe all progress? [y/N] ")?;
            if !line.trim().eq_ignore_ascii_case("y") {
                println!("aborted");
                return Ok(());
            }
            let now = current_date(prefs).await;
            let mut progress = open_progress(prefs, now).await?;
            progress.reset();
            save_progress(prefs, &progress).await?;
            println!("progress reset");
        }
    }
    Ok(())
}

// ===== Helpers =====
fn mark(done: bool) -> &'static str {
    if done { "[x]" } else { "[ ]" }
}

fn resolve_idiom<'a>(catalog: &'a Catalog, sel: &str) -> Result<&'a Idiom> {
    if let Some(idiom) = catalog.get(sel) {
        return Ok(idiom);
    }
    if let Some(idiom) = catalog
        .iter()
        .find(|idiom| idiom.title.eq_ignore_ascii_case(sel))
    {
        return Ok(idiom);
    }
    bail!("idiom not found: {}", sel)
}

fn ensure_unlocked(idiom: &Idiom, progress: &ProgressState, pro: bool) -> Result<()> {
    if is_unlocked(idiom, progress, pro) {
        return Ok(());
    }
    if idiom.is_premium {
        bail!(
            "'{}' is a Pro idiom - run `idiomaster pro on` to open every level",
            idiom.title
        );
    }
    bail!(
        "'{}' is locked - it opens once it comes up as the daily idiom",
        idiom.title
    )
}

fn print_idiom(idiom: &Idiom, progress: &ProgressState) {
    let mut markers = Vec::new();
    if idiom.is_premium {
        markers.push("premium");
    }
    if progress.has_learned(&idiom.id) {
        markers.push("learned");
    }
    if progress.is_favorite(&idiom.id) {
        markers.push("favorite");
    }
    let suffix = if markers.is_empty() {
        String::new()
    } else {
        format!("  [{}]", markers.join(", "))
    };
    println!("\n{}  ({}){}", idiom.title, idiom.level, suffix);
    println!("  meaning: {}", idiom.meaning);
    if !idiom.nuance.is_empty() {
        println!("  nuance:  {}", idiom.nuance);
    }
    for example in &idiom.examples {
        println!("  [{}] {}", example.tone, example.english);
        println!("           {}", example.translated);
    }
    if !idiom.tags.is_empty() {
        println!("  tags: {}", idiom.tags.join(", "));
    }
}

fn print_milestone(milestone: Milestone) {
    println!("milestone reached: {} idioms viewed!", milestone.threshold());
}

fn read_line(prompt: &str) -> Result<String> { print!("{prompt}"); stdout().flush().ok(); let mut s = String::new(); stdin().read_line(&mut s)?; Ok(s) }
