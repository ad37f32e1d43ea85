use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use miloto_core::models::{Calendar, DrawDate, HistoryReport, WeeklyWeights};

pub fn display_calendar(calendar: &Calendar, hot: &[u8], hot_count: usize) {
    println!(
        "\n🎯 MiLoto — Plan quincenal ({} apuestas)\n",
        calendar.total_bets()
    );
    println!(
        "Números calientes: {}  ({} caliente(s) por jugada)",
        format_numbers(hot),
        hot_count
    );
    println!("Regla: dobles en lunes y viernes; si caen en 14–15 o 29–30, el extra pasa a martes/jueves.\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Fecha", "Apuestas", "Combinaciones", ""]);

    for day in &calendar.days {
        let combos = day
            .combinations
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("\n");

        let tag = if day.is_payroll {
            Cell::new("posible alta compra").fg(Color::Yellow)
        } else {
            Cell::new("")
        };

        table.add_row(vec![
            Cell::new(day.date.spanish_label()),
            Cell::new(day.weight),
            Cell::new(combos),
            tag,
        ]);
    }
    println!("{table}");
    println!("\nEn MiLoto el orden no importa: ganas si tus 5 números coinciden con los 5 del sorteo.");
}

pub fn display_dates(weeks: &[(Vec<DrawDate>, WeeklyWeights)], payroll: impl Fn(&DrawDate) -> bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Semana", "Fecha", "Apuestas", "Nómina"]);

    for (i, (dates, weights)) in weeks.iter().enumerate() {
        for date in dates {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(date.spanish_label()),
                Cell::new(weights.get(date.day())),
                Cell::new(if payroll(date) { "sí" } else { "" }),
            ]);
        }
    }
    println!("{table}");
}

pub fn display_history(report: &HistoryReport, min_played: u32) {
    println!("\n📊 Números sugeridos por historial\n");
    println!("Sugerencia: {}", format_numbers(&report.suggested));
    if min_played > 0 {
        println!("(mínimo {} jugada(s) para entrar en el ranking)", min_played);
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Número", "Salió", "Jugado", "Ratio", "Score"]);

    for (i, stat) in report.table.iter().enumerate() {
        let suggested = report.suggested.contains(&stat.number);
        let number = Cell::new(format!("{:2}", stat.number));
        table.add_row(vec![
            Cell::new(i + 1),
            if suggested { number.fg(Color::Green) } else { number },
            Cell::new(stat.frequency),
            Cell::new(stat.played),
            Cell::new(format!("{:.3}", stat.ratio)),
            Cell::new(format!("{:.4}", stat.score)),
        ]);
    }
    println!("{table}");
}

pub fn format_numbers(numbers: &[u8]) -> String {
    if numbers.is_empty() {
        return "—".to_string();
    }
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
