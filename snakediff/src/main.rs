use anyhow::Result;
use libsnake::{MatchedMoves, Snake};

struct Args {
    path_a: String,
    path_b: String,
    greedy: bool,
    moves: bool,
}

impl Args {
    fn parse<It: Iterator<Item = String>>(mut it: It) -> Args {
        let program_name = it.next().unwrap_or_else(|| "snakediff".to_string());

        let mut greedy = false;
        let mut moves = true;
        let mut paths = Vec::new();

        for arg in it {
            match arg.as_ref() {
                "--greedy" => greedy = true,
                "--no-moves" => moves = false,
                "--help" => {
                    Self::help(&program_name);
                }
                e if e.starts_with("--") => {
                    eprintln!("Unexpected argument: {e}");
                    Self::help(&program_name);
                }
                _ => paths.push(arg),
            }
        }

        if paths.len() != 2 {
            eprintln!("Expected exactly two paths");
            Self::help(&program_name);
        }
        let path_b = paths.pop().unwrap();
        let path_a = paths.pop().unwrap();

        Args {
            path_a,
            path_b,
            greedy,
            moves,
        }
    }

    fn help(program_name: &str) -> ! {
        eprintln!(
            "Usage: {program_name} [ARGS] <file1> <file2>\n\
                Args:\n\
                --greedy: Use the greedy search instead of the linear one\n\
                --no-moves: Do not match moved content"
        );
        std::process::exit(1);
    }
}

fn deletion_color(matched: bool) -> ansi_term::Colour {
    if matched {
        ansi_term::Colour::Yellow
    } else {
        ansi_term::Colour::Red
    }
}

fn insertion_color(matched: bool) -> ansi_term::Colour {
    if matched {
        ansi_term::Colour::Blue
    } else {
        ansi_term::Colour::Green
    }
}

fn print_deleted(lines: &[&str], matched: bool) {
    let color = deletion_color(matched);
    print!("{}", color.prefix());
    for line in lines {
        println!("-{line}");
    }
    print!("{}", color.suffix());
}

fn print_inserted(lines: &[&str], matched: bool) {
    let color = insertion_color(matched);
    print!("{}", color.prefix());
    for line in lines {
        println!("+{line}");
    }
    print!("{}", color.suffix());
}

fn print_matching(lines: &[&str]) {
    for line in lines {
        println!("={line}");
    }
}

/// Emit up to three transcript runs for one snake, in the order the snake
/// covers them left to right
fn print_snake(
    snake: &Snake,
    snake_idx: usize,
    lines_a: &[&str],
    lines_b: &[&str],
    moves: &MatchedMoves,
) {
    let deleted_lines = |from: i64, to: i64| &lines_a[from as usize..to as usize];
    let inserted_lines = |from: i64, to: i64| &lines_b[from as usize..to as usize];

    if snake.forward {
        print_deleted(
            deleted_lines(snake.x_start, snake.x_mid()),
            moves.removal_matched(0, snake_idx),
        );
        print_inserted(
            inserted_lines(snake.y_start, snake.y_mid()),
            moves.insertion_matched(0, snake_idx),
        );
        print_matching(deleted_lines(snake.x_mid(), snake.x_end()));
    } else {
        print_matching(deleted_lines(snake.x_end(), snake.x_mid()));
        print_deleted(
            deleted_lines(snake.x_mid(), snake.x_start),
            moves.removal_matched(0, snake_idx),
        );
        print_inserted(
            inserted_lines(snake.y_mid(), snake.y_start),
            moves.insertion_matched(0, snake_idx),
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse(std::env::args());

    let map_a = snakediff::map_file(&args.path_a)?;
    let map_b = snakediff::map_file(&args.path_b)?;

    let lines_a = snakediff::split_lines(&map_a)?;
    let lines_b = snakediff::split_lines(&map_b)?;

    let results = if args.greedy {
        libsnake::compare_greedy(&lines_a, &lines_b)?
    } else {
        libsnake::compare(&lines_a, &lines_b)?
    };

    let moves = if args.moves {
        libsnake::match_moves(
            std::slice::from_ref(&results.snakes),
            &[lines_a.as_slice()],
            &[lines_b.as_slice()],
        )?
    } else {
        MatchedMoves::default()
    };

    for (snake_idx, snake) in results.snakes.iter().enumerate() {
        print_snake(snake, snake_idx, &lines_a, &lines_b, &moves);
    }

    Ok(())
}
