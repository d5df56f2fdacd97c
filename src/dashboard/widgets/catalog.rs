use super::WidgetDescriptor;

/// Widgets visible on a fresh dashboard.
pub const DEFAULT_ORDER: &[&str] = &["revenue", "dealDistribution", "topProducts", "tasks"];

/// Sales console widgets. Their content is supplied by the data views; the
/// placeholder renderer only shows the description.
pub fn business_widgets() -> Vec<WidgetDescriptor> {
    vec![
        WidgetDescriptor::new("revenue", "Monthly Revenue", "Performance vs targets", 8)
            .with_default_position(1, 1),
        WidgetDescriptor::new("dealDistribution", "Deal Distribution", "Win / loss breakdown", 4)
            .with_default_position(1, 9),
        WidgetDescriptor::new("topProducts", "Top 10 Products", "Sorted by revenue", 6)
            .with_default_position(2, 1),
        WidgetDescriptor::new("tasks", "My Pending Tasks", "Actionable follow-ups", 6)
            .with_default_position(2, 7),
        WidgetDescriptor::new("topCustomers", "Top Customers", "High-value accounts", 4)
            .with_default_position(3, 1),
    ]
}
