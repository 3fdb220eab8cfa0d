use adv2_core::session::AdvSession;
use adv2_core::stream::{StreamDefinition, StreamId};
use adv2_core::tags::TagDictionary;
use anyhow::Result;
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_file_summary(session: &AdvSession) -> Result<()> {
    let s = Styles::new();
    let info = session.file_info()?;

    println!();
    println!("  {}", s.title.apply_to("ADV2 File"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(9)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("File"),
        s.path.apply_to(session.path()?.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Version"),
        s.value.apply_to(info.version)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value.apply_to(format!("{}x{}", info.width, info.height))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Checksums"),
        if info.has_checksums {
            s.method.apply_to("CRC-32")
        } else {
            s.disabled.apply_to("none")
        }
    );
    let size_mb = info.file_size as f64 / (1024.0 * 1024.0);
    println!(
        "  {:<14}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!("{:.1} MB", size_mb))
    );
    println!();

    for id in [StreamId::Main, StreamId::Calibration] {
        match session.stream(id)? {
            Some(def) => print_stream(&s, def),
            None => {
                println!(
                    "  {:<14}{}",
                    s.header.apply_to(format!("{} stream", id)),
                    s.disabled.apply_to("absent")
                );
                println!();
            }
        }
    }

    println!("  {}", s.header.apply_to("Image Layouts"));
    for layout in session.image_layouts()? {
        println!(
            "    {:<12}{} bpp, {}",
            s.label.apply_to(format!("#{}", layout.layout_id)),
            s.value.apply_to(layout.bits_per_pixel),
            s.method.apply_to(layout.compression())
        );
        print_tags(&s, &layout.tags, "      ");
    }
    println!();

    println!("  {}", s.header.apply_to("System Metadata"));
    print_tags(&s, session.system_metadata()?, "    ");
    println!();
    println!("  {}", s.header.apply_to("User Metadata"));
    print_tags(&s, session.user_metadata()?, "    ");
    println!();

    Ok(())
}

fn print_stream(s: &Styles, def: &StreamDefinition) {
    println!("  {}", s.header.apply_to(format!("{} stream", def.id)));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(def.frame_count)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Clock"),
        s.value.apply_to(format!("{} Hz", def.clock_frequency))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Accuracy"),
        s.value.apply_to(def.timing_accuracy)
    );
    print_tags(s, &def.tags, "    ");
    println!();
}

fn print_tags(s: &Styles, tags: &TagDictionary, indent: &str) {
    if tags.is_empty() {
        println!("{}{}", indent, s.disabled.apply_to("(no tags)"));
        return;
    }
    for (key, value) in tags.iter() {
        println!("{}{:<28}{}", indent, s.label.apply_to(key), value);
    }
}
