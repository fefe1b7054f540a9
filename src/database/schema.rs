//! Schema del taller
//!
//! Crea las tablas si no existen. Las restricciones UNIQUE y CHECK son la
//! garantía final frente a carreras: stock nunca negativo, una factura por
//! trabajo, códigos de artículo y matrículas únicos.

use sqlx::PgPool;

const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        customer_id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        phone TEXT NOT NULL UNIQUE,
        email TEXT UNIQUE,
        address TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vehicles (
        vehicle_id SERIAL PRIMARY KEY,
        customer_id INTEGER NOT NULL REFERENCES customers(customer_id),
        plate_no TEXT NOT NULL,
        brand TEXT NOT NULL,
        model TEXT NOT NULL,
        year INTEGER,
        color TEXT
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS vehicles_plate_no_lower_key ON vehicles (LOWER(plate_no))",
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        employee_id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        position TEXT,
        phone TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory (
        part_id SERIAL PRIMARY KEY,
        part_name TEXT NOT NULL,
        part_code TEXT NOT NULL UNIQUE,
        brand TEXT,
        unit_price NUMERIC(12, 2) NOT NULL CHECK (unit_price >= 0),
        quantity_in_stock INTEGER NOT NULL DEFAULT 0 CHECK (quantity_in_stock >= 0),
        quantity_label TEXT NOT NULL DEFAULT 'pcs',
        reorder_level INTEGER NOT NULL DEFAULT 0,
        description TEXT,
        image_url TEXT,
        last_updated TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS service_requests (
        request_id SERIAL PRIMARY KEY,
        vehicle_id INTEGER NOT NULL REFERENCES vehicles(vehicle_id),
        service_type TEXT NOT NULL,
        problem_note TEXT,
        priority TEXT NOT NULL DEFAULT 'Normal',
        status TEXT NOT NULL DEFAULT 'Pending'
            CHECK (status IN ('Pending', 'In Progress', 'Completed', 'Cancelled')),
        request_date DATE NOT NULL DEFAULT CURRENT_DATE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS service_jobs (
        job_id SERIAL PRIMARY KEY,
        request_id INTEGER NOT NULL REFERENCES service_requests(request_id),
        employee_id INTEGER REFERENCES employees(employee_id),
        job_status TEXT NOT NULL DEFAULT 'In Progress'
            CHECK (job_status IN ('In Progress', 'Completed')),
        labor_charge NUMERIC(12, 2) NOT NULL DEFAULT 0 CHECK (labor_charge >= 0),
        start_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        end_time TIMESTAMPTZ,
        CHECK ((job_status = 'Completed') = (end_time IS NOT NULL))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_parts_used (
        usage_id SERIAL PRIMARY KEY,
        job_id INTEGER NOT NULL REFERENCES service_jobs(job_id),
        part_id INTEGER NOT NULL REFERENCES inventory(part_id),
        quantity_used INTEGER NOT NULL CHECK (quantity_used > 0),
        unit_price_at_time NUMERIC(12, 2) NOT NULL,
        used_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS billing (
        bill_id SERIAL PRIMARY KEY,
        job_id INTEGER NOT NULL UNIQUE REFERENCES service_jobs(job_id),
        subtotal_labor NUMERIC(12, 2) NOT NULL,
        subtotal_parts NUMERIC(12, 2) NOT NULL,
        tax NUMERIC(12, 2) NOT NULL,
        total_amount NUMERIC(12, 2) NOT NULL,
        payment_status TEXT NOT NULL DEFAULT 'Unpaid'
            CHECK (payment_status IN ('Unpaid', 'Paid')),
        bill_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        payment_date TIMESTAMPTZ
    )
    "#,
];

/// Crea tablas e índices que falten; es idempotente
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    log::info!("✅ Schema verificado ({} sentencias)", SCHEMA_STATEMENTS.len());
    Ok(())
}
