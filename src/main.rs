use chrono::Utc;
use skillbound::core::leveling::{level_progress, XpCurve};
use skillbound::game::Game;
use skillbound::{build_info, AdvanceReport, GameConfig, PlayerState, PlayerStore, SkillId, StaticCatalog};
use std::process;
use tracing_subscriber::EnvFilter;

type CliGame = Game<Box<dyn PlayerStore>, StaticCatalog>;

fn print_help() {
    println!("Skillbound - idle skilling and combat\n");
    println!("Usage: skillbound <command> [args]\n");
    println!("Commands:");
    println!("  new [id]                 Create a player (random id when omitted)");
    println!("  list                     List players");
    println!("  status <id>              Catch up and show a player");
    println!("  advance <id>             Catch up to now");
    println!("  start <id> <skill>       Start training a skill");
    println!("  stop <id> <skill>        Stop training a skill");
    println!("  buy <id> <item> [qty]    Buy from the shop");
    println!("  sell <id> <item> [qty]   Sell to the shop");
    println!("  craft <id> <item>        Craft an item");
    println!("  equip <id> <item>        Equip an item");
    println!("  unequip <id> <slot>      Unequip weapon or armor");
    println!("  fight <id> <enemy>       Start fighting an enemy");
    println!("  flee <id>                Stop fighting");
    println!("  --version                Show version information");
    println!("  --help                   Show this help message");
    println!("\nSet RUST_LOG=debug for detailed logs.");
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> &'a str {
    match args.get(index) {
        Some(value) => value,
        None => fail(format!(
            "missing <{}>; run 'skillbound --help' for usage",
            name
        )),
    }
}

fn quantity_arg(args: &[String], index: usize) -> u32 {
    match args.get(index) {
        None => 1,
        Some(raw) => raw
            .parse()
            .unwrap_or_else(|_| fail(format!("invalid quantity: {}", raw))),
    }
}

fn skill_arg(args: &[String], index: usize) -> SkillId {
    let raw = arg(args, index, "skill");
    raw.parse().unwrap_or_else(|e| fail(format!("unknown skill: {}", e)))
}

fn open_game() -> CliGame {
    let config = GameConfig::load().unwrap_or_else(|e| fail(e));
    let store = config.open_store().unwrap_or_else(|e| fail(e));
    let catalog = config.load_catalog().unwrap_or_else(|e| fail(e));
    Game::new(store, catalog).with_max_catch_up(config.max_catch_up_ms)
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Catches a player up before running a command against it.
fn catch_up(game: &CliGame, id: &str) -> AdvanceReport {
    game.advance(id, now_ms()).unwrap_or_else(|e| fail(e))
}

fn print_report(report: &AdvanceReport) {
    if report.elapsed_ms == 0 {
        return;
    }
    println!("Caught up {:.1}s", report.elapsed_ms as f64 / 1000.0);
    for gathered in &report.gathering {
        print!(
            "  {}: +{:.1} xp, +{} {}",
            gathered.skill, gathered.xp_gained, gathered.quantity, gathered.output_item
        );
        if gathered.levels_gained > 0 {
            print!(" (+{} levels)", gathered.levels_gained);
        }
        if gathered.doubled {
            print!(" [doubled]");
        }
        for bonus in &gathered.bonus_items {
            print!(" [+1 {}]", bonus);
        }
        println!();
    }
    if let Some(combat) = &report.combat {
        println!(
            "  combat vs {}: {} rounds, dealt {}, took {}, {:?}",
            combat.enemy_id, combat.rounds, combat.damage_dealt, combat.damage_taken, combat.outcome
        );
        if combat.gold_gained > 0 {
            println!("    +{} gold", combat.gold_gained);
        }
        for (item_id, quantity) in &combat.loot {
            println!("    loot: {} x{}", item_id, quantity);
        }
    }
    for failure in &report.failures {
        println!("  {} failed: {}", failure.skill, failure.error);
    }
}

fn print_status(player: &PlayerState) {
    println!("Player {}", player.id);
    println!(
        "  Gold: {}   Health: {}/{}",
        player.gold,
        player.combat.player_health,
        player.max_health()
    );

    println!("\nSkills:");
    for skill in player.skills.values() {
        let progress = level_progress(XpCurve::Skill, skill.xp, skill.level) * 100.0;
        print!(
            "  {:<12} lvl {:>2}  {:>10.1} xp  {:>5.1}%",
            skill.name, skill.level, skill.xp, progress
        );
        if let Some(mastery) = &skill.mastery {
            print!("  mastery {}", mastery.level);
        }
        if skill.is_active {
            print!("  [active]");
        }
        println!();
    }

    println!("\nInventory:");
    if player.inventory.is_empty() {
        println!("  (empty)");
    }
    for item in player.inventory.iter() {
        println!("  {:<16} x{}", item.name, item.quantity);
    }

    println!("\nEquipment:");
    for item in player.equipment.iter_equipped() {
        if let Some(slot) = item.slot() {
            println!("  {:<8} {}", slot.name(), item.name);
        }
    }
    println!(
        "  attack {}  strength {}  defence {}",
        player.total_attack(),
        player.total_strength(),
        player.total_defense()
    );

    if let Some(enemy) = &player.combat.current_enemy {
        println!(
            "\nFighting {} ({}/{} hp)",
            enemy.name, enemy.health, enemy.max_health
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        print_help();
        process::exit(1);
    };

    match command.as_str() {
        "--version" | "-v" => {
            println!("{}", build_info::version_line());
        }
        "--help" | "-h" => print_help(),
        "new" => {
            let game = open_game();
            let id = args
                .get(2)
                .cloned()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let player = game.create_player(&id, now_ms()).unwrap_or_else(|e| fail(e));
            println!("Created player {}", player.id);
        }
        "list" => {
            let game = open_game();
            for id in game.list_players().unwrap_or_else(|e| fail(e)) {
                println!("{}", id);
            }
        }
        "status" | "advance" => {
            let game = open_game();
            let id = arg(&args, 2, "id");
            let report = catch_up(&game, id);
            print_report(&report);
            if command == "status" {
                let player = game.player(id).unwrap_or_else(|e| fail(e));
                print_status(&player);
            }
        }
        "start" | "stop" => {
            let game = open_game();
            let id = arg(&args, 2, "id");
            let skill = skill_arg(&args, 3);
            print_report(&catch_up(&game, id));
            let result = if command == "start" {
                game.start_skill(id, skill)
            } else {
                game.stop_skill(id, skill)
            };
            result.unwrap_or_else(|e| fail(e));
            println!("{} {}", if command == "start" { "Started" } else { "Stopped" }, skill);
        }
        "buy" | "sell" => {
            let game = open_game();
            let id = arg(&args, 2, "id");
            let item_id = arg(&args, 3, "item");
            let quantity = quantity_arg(&args, 4);
            print_report(&catch_up(&game, id));
            if command == "buy" {
                let trade = game.buy_item(id, item_id, quantity).unwrap_or_else(|e| fail(e));
                println!("Bought {} {} for {} gold", trade.quantity, trade.item_id, trade.gold);
            } else {
                let trade = game.sell_item(id, item_id, quantity).unwrap_or_else(|e| fail(e));
                println!("Sold {} {} for {} gold", trade.quantity, trade.item_id, trade.gold);
            }
        }
        "craft" => {
            let game = open_game();
            let id = arg(&args, 2, "id");
            let item_id = arg(&args, 3, "item");
            print_report(&catch_up(&game, id));
            let crafted = game.craft_item(id, item_id).unwrap_or_else(|e| fail(e));
            println!(
                "Crafted {} {} (+{:.0} {} xp)",
                crafted.quantity, crafted.item_id, crafted.xp_gained, crafted.skill
            );
        }
        "equip" => {
            let game = open_game();
            let id = arg(&args, 2, "id");
            let item_id = arg(&args, 3, "item");
            print_report(&catch_up(&game, id));
            match game.equip_item(id, item_id).unwrap_or_else(|e| fail(e)) {
                Some(previous) => println!("Equipped {}, returned {} to inventory", item_id, previous.name),
                None => println!("Equipped {}", item_id),
            }
        }
        "unequip" => {
            let game = open_game();
            let id = arg(&args, 2, "id");
            let slot = arg(&args, 3, "slot");
            print_report(&catch_up(&game, id));
            let item = game.unequip_item(id, slot).unwrap_or_else(|e| fail(e));
            println!("Unequipped {}", item.name);
        }
        "fight" => {
            let game = open_game();
            let id = arg(&args, 2, "id");
            let enemy_id = arg(&args, 3, "enemy");
            print_report(&catch_up(&game, id));
            let enemy = game.start_combat(id, enemy_id).unwrap_or_else(|e| fail(e));
            println!("Fighting {} ({} hp)", enemy.name, enemy.max_health);
        }
        "flee" => {
            let game = open_game();
            let id = arg(&args, 2, "id");
            print_report(&catch_up(&game, id));
            game.stop_combat(id).unwrap_or_else(|e| fail(e));
            println!("Left combat");
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Run 'skillbound --help' for usage.");
            process::exit(1);
        }
    }
}
