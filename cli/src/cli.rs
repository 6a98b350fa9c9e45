mod commands;

use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result, anyhow};
use futures::stream::{FuturesUnordered, StreamExt};
use prefpop_core::{ChartData, FetchRequest, PrefCode, SeriesStatus, Session};

use crate::http::ResasClient;
use commands::{CommandRegistry, Context, Flow};

pub async fn run(client: &ResasClient, session: &mut Session, initial: &[String]) -> Result<()> {
    print_intro(session);
    let registry = CommandRegistry::default();

    if !initial.is_empty() {
        let line = format!("check {}", initial.join(" "));
        execute_line(&registry, client, session, &line).await;
    }

    let stdin = io::stdin();
    loop {
        print!("選択{}件> ", session.selection().len());
        io::stdout()
            .flush()
            .context("プロンプトのフラッシュに失敗しました")?;

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("入力の読み込みに失敗しました")?;

        if bytes == 0 {
            println!("入力が終了したため終了します。");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if execute_line(&registry, client, session, trimmed).await == Flow::Quit {
            return Ok(());
        }
    }
}

async fn execute_line(
    registry: &CommandRegistry,
    client: &ResasClient,
    session: &mut Session,
    line: &str,
) -> Flow {
    let (flow, pending) = {
        let mut ctx = Context::new(session);
        let flow = registry.execute_input(&mut ctx, line).unwrap_or_else(|error| {
            println!("エラー: {error}");
            Flow::Continue
        });
        (flow, ctx.into_pending())
    };
    fetch_pending(client, session, pending).await;
    flow
}

/// Sends all requests at once and applies each result as soon as it arrives.
async fn fetch_pending(client: &ResasClient, session: &mut Session, pending: Vec<FetchRequest>) {
    let mut in_flight: FuturesUnordered<_> = pending
        .into_iter()
        .map(|request| async move {
            let result = client.fetch_population(request.pref_code).await;
            (request.pref_code, result)
        })
        .collect();

    while let Some((pref_code, result)) = in_flight.next().await {
        match &result {
            Ok(_) => println!(
                "{} の人口データを取得しました。",
                display_name(session, pref_code)
            ),
            Err(error) => println!("エラー: {error}"),
        }
        session.apply_series(pref_code, result);
    }
}

fn print_intro(session: &Session) {
    println!("都道府県別 総人口推移ビューアへようこそ。");
    if session.catalog().is_empty() {
        println!("都道府県一覧を取得できませんでした。選択できる都道府県はありません。");
    } else {
        println!("{} 都道府県を選択できます。", session.catalog().len());
    }
    println!("コマンド例: list / check 13 / check 北海道 大阪府 / chart / uncheck 13");
    println!("help で利用可能なコマンド一覧を表示します。");
}

pub(crate) fn print_help() {
    println!("利用可能なコマンド:");
    println!("  list                  都道府県の一覧と選択状態を表示");
    println!("  check <都道府県>...   都道府県を選択 (コードまたは名称)");
    println!("  uncheck <都道府県>... 選択を解除");
    println!("  selected              選択中の都道府県を選択順に表示");
    println!("  status                人口データの取得状況を表示");
    println!("  chart                 選択中の都道府県の総人口推移を表示");
    println!("  export [ファイル]     グラフデータを JSON で出力");
    println!("  quit                  終了");
}

pub(crate) fn print_catalog(session: &Session) {
    if session.catalog().is_empty() {
        println!("選択できる都道府県がありません。");
        return;
    }
    for pref in session.catalog() {
        let mark = if session.is_selected(pref.pref_code) {
            "[x]"
        } else {
            "[ ]"
        };
        println!("{} {:>2} {}", mark, pref.pref_code, pref.pref_name);
    }
}

pub(crate) fn print_selection(session: &Session) {
    if session.selection().is_empty() {
        println!("選択中の都道府県はありません。");
        return;
    }
    for (order, pref_code) in session.selection().iter().enumerate() {
        println!(
            "{:>2}. {} ({})",
            order + 1,
            display_name(session, pref_code),
            session.status(pref_code).label()
        );
    }
}

pub(crate) fn print_status(session: &Session) {
    let mut shown = false;
    for pref in session.catalog() {
        let status = session.status(pref.pref_code);
        if status == SeriesStatus::NotFetched {
            continue;
        }
        shown = true;
        match session.series().failure(pref.pref_code) {
            Some(failure) => println!(
                "{:>2} {}: {} ({failure})",
                pref.pref_code,
                pref.pref_name,
                status.label()
            ),
            None => println!("{:>2} {}: {}", pref.pref_code, pref.pref_name, status.label()),
        }
    }
    if !shown {
        println!("まだ人口データを取得していません。");
    }
}

pub(crate) fn print_chart(chart: &ChartData) {
    if chart.is_empty() {
        println!("選択中の都道府県はありません。");
        return;
    }
    print!("{:>6}", chart.x_label);
    for dataset in &chart.datasets {
        print!(" | {:>12}", dataset.label);
    }
    println!();
    for (idx, year) in chart.years.iter().enumerate() {
        print!("{:>6}", year);
        for dataset in &chart.datasets {
            match dataset.values.get(idx).copied().flatten() {
                Some(value) => print!(" | {:>12.0}", value),
                None => print!(" | {:>12}", "-"),
            }
        }
        println!();
    }
    println!("({})", chart.y_label);
}

pub(crate) fn resolve_pref_code(session: &Session, token: &str) -> Result<PrefCode> {
    session
        .find_prefecture(token)
        .map(|pref| pref.pref_code)
        .ok_or_else(|| {
            anyhow!(
                "都道府県を特定できませんでした: {} (コードか正式名称を入力してください)",
                token
            )
        })
}

fn display_name(session: &Session, pref_code: PrefCode) -> String {
    session
        .prefecture_name(pref_code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("コード{pref_code}"))
}
