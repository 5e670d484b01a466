use crate::app::App;
use crate::domain::{Customer, CustomerForm};
use crate::CustomerFields;

use super::{loaded, CommandResult};

pub async fn list(app: &App, search: &str) -> CommandResult {
    let customers = loaded(app.customers(search).await)?;
    if customers.is_empty() {
        if search.is_empty() {
            println!("No customers yet.");
        } else {
            println!("No customers found matching your search.");
        }
        return Ok(());
    }
    for customer in &customers {
        println!(
            "{:>6}  {:<28} {:<28} credit {:>8.2}",
            customer.id,
            customer.full_name(),
            customer.email,
            customer.store_credit
        );
    }
    Ok(())
}

pub async fn show(app: &App, id: &str) -> CommandResult {
    let customer = app.client().get_customer(id).await?;
    print_customer(&customer);
    Ok(())
}

pub async fn add(app: &App, fields: CustomerFields) -> CommandResult {
    let form = apply(CustomerForm::default(), fields);
    let customer = app.save_customer(None, form).await?;
    print_customer(&customer);
    Ok(())
}

pub async fn edit(app: &App, id: &str, fields: CustomerFields) -> CommandResult {
    let current = app.client().get_customer(id).await?;
    let form = apply(CustomerForm::from(&current), fields);
    let customer = app.save_customer(Some(id), form).await?;
    print_customer(&customer);
    Ok(())
}

pub async fn delete(app: &App, id: &str) -> CommandResult {
    app.delete_customer(id).await?;
    Ok(())
}

fn apply(mut form: CustomerForm, fields: CustomerFields) -> CustomerForm {
    if let Some(value) = fields.first_name {
        form.first_name = value;
    }
    if let Some(value) = fields.last_name {
        form.last_name = value;
    }
    if let Some(value) = fields.email {
        form.email = value;
    }
    if let Some(value) = fields.company {
        form.company = value;
    }
    if let Some(value) = fields.phone {
        form.phone_number = value;
    }
    if let Some(value) = fields.store_credit {
        form.store_credit = value;
    }
    if let Some(value) = fields.discount {
        form.discount = value;
    }
    if let Some(value) = fields.notes {
        form.notes = value;
    }
    form
}

fn print_customer(customer: &Customer) {
    println!("{} (#{})", customer.full_name(), customer.id);
    println!("  email     {}", customer.email);
    println!("  company   {}", customer.company);
    println!("  phone     {}", customer.phone_number);
    println!("  credit    {:.2}", customer.store_credit);
    println!("  discount  {}%", customer.discount);
    if !customer.notes.is_empty() {
        println!("  notes     {}", customer.notes);
    }
}
