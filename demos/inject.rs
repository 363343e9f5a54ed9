use prop_inject::{inject, inject_with_report, injectable, injectable_enum, Config, Outcome};

injectable_enum! {
    #[derive(Debug, Clone, Copy, Default)]
    enum Mode {
        #[default]
        Standby,
        Active,
    }
}

#[derive(Debug, Default)]
struct Database {
    url: String,
    pool: i32,
}

#[derive(Debug, Default)]
struct App {
    database: Database,
    name: String,
    debug: bool,
    mode: Mode,
}

injectable!(Database { url => "database.${env}.url", pool => "database.pool" });
injectable!(App { name => "app.name", debug => "app.debug", mode => "app.mode" } extends database: Database);

fn main() -> Result<(), prop_inject::Error> {
    // Later layers win; APP__ENV=prod switches the database url
    let parameters = Config::builder()
        .with_file("demos/default.toml", true)
        .with_file("demos/dev.toml", false)
        .with_env("APP", "__")
        .build()?;

    let mut app = App::default();
    inject(&mut app, &parameters)?;

    println!("App: {} (debug={}, mode={:?})", app.name, app.debug, app.mode);
    println!("Database: {} (pool={})", app.database.url, app.database.pool);

    let report = inject_with_report(&mut app, &parameters)?;
    for outcome in report.iter().filter(|o| !o.is_written()) {
        if let Outcome::Missing { field, key } = outcome {
            println!("no parameter for {field} at {key}");
        }
    }

    Ok(())
}
