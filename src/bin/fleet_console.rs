//! Consola interactiva de la flota
//!
//! Capa de presentación en terminal sobre el núcleo de vistas: menús,
//! tablas y confirmación de borrado por teclado.

use std::io::{self, Write};
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use colored::*;
use dotenvy::dotenv;

use bus_fleet::clients::FleetApiClient;
use bus_fleet::config::EnvironmentConfig;
use bus_fleet::models::{Bus, BusDraft, BusStatus, Reservation, ReservationDraft, Route, RouteDraft, Schedule, ScheduleDraft};
use bus_fleet::services::EntityValidator;
use bus_fleet::views::display::{
    bus_label, format_date, format_date_time, reservation_route_label, route_label,
    schedule_option_label, status_tone, StatusTone,
};
use bus_fleet::views::{
    ConfirmPrompt, DashboardView, FormPhase, FormResource, RemoveOutcome, ReservationReferences,
    ResourceForm, ResourceList, ScheduleReferences, SubmitOutcome,
};

const DATE_TIME_INPUT: &str = "%d/%m/%Y %H:%M";
const DATE_INPUT: &str = "%d/%m/%Y";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // La consola solo muestra avisos; el detalle queda para el servidor
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let api = FleetApiClient::from_config(&config)?;
    let validator = EntityValidator::new(config.validation.clone());

    println!("{}", "🚌 Gestión de Flota de Autobuses".bright_blue().bold());
    println!("{}", "=================================".bright_blue());
    println!("Backend: {}", api.base_url().bright_white());

    match main_menu(&api, &validator).await {
        // stdin cerrado (Ctrl+D o entrada redirigida agotada)
        Err(e) if is_end_of_input(&e) => {
            println!();
            println!("{}", "👋 ¡Hasta luego!".bright_green());
            Ok(())
        }
        other => other,
    }
}

fn is_end_of_input(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<io::Error>()
        .map(|e| e.kind() == io::ErrorKind::UnexpectedEof)
        .unwrap_or(false)
}

async fn main_menu(api: &FleetApiClient, validator: &EntityValidator) -> Result<()> {
    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 📊 Panel");
        println!("2. 🚌 Autobuses");
        println!("3. 🛣️  Rutas");
        println!("4. 🕒 Horarios");
        println!("5. 🎫 Reservas");
        println!("6. 🚪 Salir");

        match prompt("Selecciona una opción (1-6): ")?.as_str() {
            "1" => show_dashboard(api).await,
            "2" => resource_menu::<Bus>(api, validator).await?,
            "3" => resource_menu::<Route>(api, validator).await?,
            "4" => resource_menu::<Schedule>(api, validator).await?,
            "5" => resource_menu::<Reservation>(api, validator).await?,
            "6" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
        }
    }

    Ok(())
}

/// Confirmación por teclado, "s" para aceptar
struct StdinConfirm;

#[async_trait]
impl ConfirmPrompt for StdinConfirm {
    async fn confirm(&self, message: &str) -> bool {
        match prompt(&format!("{} (s/N): ", message)) {
            Ok(answer) => matches!(answer.to_lowercase().as_str(), "s" | "si" | "sí" | "y"),
            Err(_) => false,
        }
    }
}

/// Recurso con tabla y formulario en la consola
trait ConsoleResource: FormResource {
    const TITLE: &'static str;

    fn print_table(items: &[Self]);

    fn edit_draft(draft: &mut Self::Draft, references: &Self::References) -> io::Result<()>;
}

async fn show_dashboard(api: &FleetApiClient) {
    let dashboard = DashboardView::new();
    let _ = dashboard.load(api).await;
    let state = dashboard.snapshot().await;

    println!();
    println!("{}", "📊 PANEL".bright_cyan().bold());
    match (state.counts, state.error) {
        (Some(counts), _) => {
            println!("  Autobuses: {}", counts.buses.to_string().bright_white().bold());
            println!("  Rutas:     {}", counts.routes.to_string().bright_white().bold());
            println!("  Horarios:  {}", counts.schedules.to_string().bright_white().bold());
            println!("  Reservas:  {}", counts.reservations.to_string().bright_white().bold());
        }
        (None, Some(error)) => println!("{}", format!("❌ {}", error).bright_red()),
        (None, None) => {}
    }
}

async fn resource_menu<E: ConsoleResource>(
    api: &FleetApiClient,
    validator: &EntityValidator,
) -> Result<()> {
    loop {
        println!();
        println!("{}", E::TITLE.bright_cyan().bold());
        println!("1. 🔍 Listar");
        println!("2. ➕ Crear");
        println!("3. ✏️  Editar");
        println!("4. 🗑️  Eliminar");
        println!("5. ↩️  Volver");

        match prompt("Selecciona una opción (1-5): ")?.as_str() {
            "1" => list_resource::<E>(api).await,
            "2" => run_form(ResourceForm::<E>::create(), api, validator).await?,
            "3" => {
                if let Some(id) = prompt_id()? {
                    run_form(ResourceForm::<E>::edit(id), api, validator).await?;
                }
            }
            "4" => {
                if let Some(id) = prompt_id()? {
                    delete_resource::<E>(api, id).await;
                }
            }
            "5" => return Ok(()),
            _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
        }
    }
}

async fn list_resource<E: ConsoleResource>(api: &FleetApiClient) {
    let list = ResourceList::<E>::new();
    let _ = list.load(api).await;
    let state = list.snapshot().await;

    if let Some(error) = state.error {
        println!("{}", format!("❌ {}", error).bright_red());
        return;
    }
    if state.items.is_empty() {
        println!("{}", "(sin registros)".dimmed());
        return;
    }
    E::print_table(&state.items);
}

async fn delete_resource<E: ConsoleResource>(api: &FleetApiClient, id: i64) {
    let list = ResourceList::<E>::new();
    match list.remove(api, &StdinConfirm, id).await {
        Ok(RemoveOutcome::Removed) => {
            println!("{}", "✅ Eliminado correctamente".bright_green());
            E::print_table(&list.items().await);
        }
        Ok(RemoveOutcome::Declined) => println!("{}", "Operación cancelada".dimmed()),
        Ok(RemoveOutcome::Stale) => {}
        Err(_) => {
            if let Some(error) = list.error().await {
                println!("{}", format!("❌ {}", error).bright_red());
            }
        }
    }
}

async fn run_form<E: ConsoleResource>(
    form: ResourceForm<E>,
    api: &FleetApiClient,
    validator: &EntityValidator,
) -> Result<()> {
    let _ = form.load(api).await;
    if form.phase().await == FormPhase::Failed {
        if let Some(error) = form.error().await {
            println!("{}", format!("❌ {}", error).bright_red());
        }
        return Ok(());
    }

    loop {
        let state = form.snapshot().await;
        let mut draft = state.draft.clone();
        E::edit_draft(&mut draft, &state.references)?;
        form.update_draft(|current| *current = draft).await;

        match form.submit(api, validator).await {
            Ok(SubmitOutcome::Saved(entity)) => {
                println!("{}", "✅ Guardado correctamente".bright_green());
                E::print_table(std::slice::from_ref(&entity));
                return Ok(());
            }
            Ok(SubmitOutcome::Ignored) | Ok(SubmitOutcome::Stale) => return Ok(()),
            Err(_) => {
                if let Some(error) = form.error().await {
                    println!("{}", format!("❌ {}", error).bright_red());
                }
                if !StdinConfirm.confirm("¿Corregir los datos y reintentar?").await {
                    form.close();
                    return Ok(());
                }
            }
        }
    }
}

impl ConsoleResource for Bus {
    const TITLE: &'static str = "🚌 AUTOBUSES";

    fn print_table(items: &[Self]) {
        println!(
            "{}",
            format!(
                "{:>4}  {:<12} {:<20} {:>9} {:>5}  {}",
                "ID", "Número", "Modelo", "Capacidad", "Año", "Estado"
            )
            .bold()
        );
        for bus in items {
            let label = bus.status.label();
            let status = match status_tone(bus.status) {
                StatusTone::Success => label.green(),
                StatusTone::Warning => label.yellow(),
                StatusTone::Error => label.red(),
            };
            println!(
                "{:>4}  {:<12} {:<20} {:>9} {:>5}  {}",
                bus.id, bus.bus_number, bus.model, bus.capacity, bus.year, status
            );
        }
    }

    fn edit_draft(draft: &mut BusDraft, _references: &()) -> io::Result<()> {
        draft.bus_number = prompt_text("Número de autobús", &draft.bus_number)?;
        draft.model = prompt_text("Modelo", &draft.model)?;
        draft.capacity = prompt_parse("Capacidad", draft.capacity)?;
        draft.year = prompt_parse("Año", draft.year)?;

        for (index, status) in BusStatus::ALL.iter().enumerate() {
            println!("  {}. {}", index + 1, status.label());
        }
        let choice = prompt_text("Estado (número)", &(status_index(draft.status) + 1).to_string())?;
        if let Some(status) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| BusStatus::ALL.get(n))
        {
            draft.status = *status;
        }
        Ok(())
    }
}

fn status_index(status: BusStatus) -> usize {
    BusStatus::ALL
        .iter()
        .position(|candidate| *candidate == status)
        .unwrap_or(0)
}

impl ConsoleResource for Route {
    const TITLE: &'static str = "🛣️  RUTAS";

    fn print_table(items: &[Self]) {
        println!(
            "{}",
            format!(
                "{:>4}  {:<20} {:<16} {:<16} {:>10}",
                "ID", "Nombre", "Origen", "Destino", "Distancia"
            )
            .bold()
        );
        for route in items {
            println!(
                "{:>4}  {:<20} {:<16} {:<16} {:>7.1} km",
                route.id, route.route_name, route.origin, route.destination, route.distance
            );
        }
    }

    fn edit_draft(draft: &mut RouteDraft, _references: &()) -> io::Result<()> {
        draft.route_name = prompt_text("Nombre de la ruta", &draft.route_name)?;
        draft.origin = prompt_text("Origen", &draft.origin)?;
        draft.destination = prompt_text("Destino", &draft.destination)?;
        draft.distance = prompt_parse("Distancia (km)", draft.distance)?;
        Ok(())
    }
}

impl ConsoleResource for Schedule {
    const TITLE: &'static str = "🕒 HORARIOS";

    fn print_table(items: &[Self]) {
        println!(
            "{}",
            format!(
                "{:>4}  {:<10} {:<32} {:<17} {:<17}",
                "ID", "Autobús", "Ruta", "Salida", "Llegada"
            )
            .bold()
        );
        for schedule in items {
            println!(
                "{:>4}  {:<10} {:<32} {:<17} {:<17}",
                schedule.id,
                bus_label(schedule),
                route_label(schedule),
                format_date_time(&schedule.departure_time),
                format_date_time(&schedule.arrival_time)
            );
        }
    }

    fn edit_draft(draft: &mut ScheduleDraft, references: &ScheduleReferences) -> io::Result<()> {
        println!("{}", "Autobuses disponibles:".bright_blue());
        for bus in &references.buses {
            println!("  {}. {} - {}", bus.id, bus.bus_number, bus.model);
        }
        draft.bus_id = prompt_optional_id("Autobús (id)", draft.bus_id)?;

        println!("{}", "Rutas disponibles:".bright_blue());
        for route in &references.routes {
            println!(
                "  {}. {} ({} - {})",
                route.id, route.route_name, route.origin, route.destination
            );
        }
        draft.route_id = prompt_optional_id("Ruta (id)", draft.route_id)?;

        let departure = prompt_date_time("Salida", draft.departure_time)?;
        draft.set_departure_time(departure);

        // La llegada debe ser posterior a la salida
        loop {
            let arrival = prompt_date_time("Llegada", draft.suggested_arrival())?;
            match draft.set_arrival_time(arrival) {
                Ok(()) => break,
                Err(error) => {
                    let message = error.message.map(|m| m.to_string()).unwrap_or_default();
                    println!("{}", format!("❌ {}", message).bright_red());
                }
            }
        }
        Ok(())
    }
}

impl ConsoleResource for Reservation {
    const TITLE: &'static str = "🎫 RESERVAS";

    fn print_table(items: &[Self]) {
        println!(
            "{}",
            format!(
                "{:>4}  {:<22} {:<32} {:>7}  {:<10}",
                "ID", "Pasajero", "Ruta", "Asiento", "Fecha"
            )
            .bold()
        );
        for reservation in items {
            println!(
                "{:>4}  {:<22} {:<32} {:>7}  {:<10}",
                reservation.id,
                reservation.passenger_name,
                reservation_route_label(reservation),
                reservation.seat_number,
                format_date(&reservation.reservation_date)
            );
        }
    }

    fn edit_draft(draft: &mut ReservationDraft, references: &ReservationReferences) -> io::Result<()> {
        println!("{}", "Horarios disponibles:".bright_blue());
        for schedule in &references.schedules {
            println!("  {}. {}", schedule.id, schedule_option_label(schedule));
        }
        draft.schedule_id = prompt_optional_id("Horario (id)", draft.schedule_id)?;
        draft.passenger_name = prompt_text("Nombre del pasajero", &draft.passenger_name)?;
        draft.seat_number = prompt_optional_parse("Número de asiento", draft.seat_number)?;

        let current = draft.reservation_date.format(DATE_INPUT).to_string();
        loop {
            let input = prompt_text("Fecha de reserva (dd/mm/aaaa)", &current)?;
            match NaiveDate::parse_from_str(&input, DATE_INPUT) {
                Ok(date) => {
                    draft.reservation_date = date;
                    break;
                }
                Err(_) => println!("{}", "❌ Fecha inválida".bright_red()),
            }
        }
        Ok(())
    }
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "entrada cerrada"));
    }
    Ok(input.trim().to_string())
}

/// Pedir un texto; Enter conserva el valor actual
fn prompt_text(label: &str, current: &str) -> io::Result<String> {
    let input = prompt(&format!("{} [{}]: ", label, current))?;
    Ok(if input.is_empty() {
        current.to_string()
    } else {
        input
    })
}

fn prompt_parse<T>(label: &str, current: T) -> io::Result<T>
where
    T: FromStr + ToString,
{
    loop {
        let input = prompt_text(label, &current.to_string())?;
        match input.parse::<T>() {
            Ok(value) => return Ok(value),
            Err(_) => println!("{}", "❌ Valor inválido".bright_red()),
        }
    }
}

fn prompt_optional_parse<T>(label: &str, current: Option<T>) -> io::Result<Option<T>>
where
    T: FromStr + ToString,
{
    let shown = current.as_ref().map(ToString::to_string).unwrap_or_default();
    loop {
        let input = prompt_text(label, &shown)?;
        if input.is_empty() {
            return Ok(None);
        }
        match input.parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => println!("{}", "❌ Valor inválido".bright_red()),
        }
    }
}

fn prompt_optional_id(label: &str, current: Option<i64>) -> io::Result<Option<i64>> {
    prompt_optional_parse(label, current)
}

fn prompt_id() -> io::Result<Option<i64>> {
    let input = prompt("Id: ")?;
    match input.parse::<i64>() {
        Ok(id) => Ok(Some(id)),
        Err(_) => {
            println!("{}", "❌ Id inválido".bright_red());
            Ok(None)
        }
    }
}

fn prompt_date_time(label: &str, current: DateTime<Utc>) -> io::Result<DateTime<Utc>> {
    let shown = current.format(DATE_TIME_INPUT).to_string();
    loop {
        let input = prompt_text(&format!("{} (dd/mm/aaaa hh:mm)", label), &shown)?;
        match NaiveDateTime::parse_from_str(&input, DATE_TIME_INPUT) {
            Ok(naive) => return Ok(Utc.from_utc_datetime(&naive)),
            Err(_) => println!("{}", "❌ Fecha y hora inválidas".bright_red()),
        }
    }
}
