use bevy::prelude::*;

use crate::core::system::system_order::SessionSet;
use crate::gameplay::plugin::{CoordinateReadout, LogCoordinatesRequested, SessionOutcome};
use crate::gameplay::state::GameState;

/// Centered pass/fail card, hidden while the run is going.
#[derive(Component)]
pub struct OutcomeCard;

#[derive(Component)]
pub struct OutcomeCardText;

/// Button that logs the ball position.
#[derive(Component)]
pub struct LogCoordinatesButton;

#[derive(Component)]
pub struct CoordinateReadoutText;

const BUTTON_IDLE: Color = Color::srgba(0.1, 0.1, 0.15, 0.8);
const BUTTON_HOVER: Color = Color::srgba(0.2, 0.2, 0.3, 0.9);
const BUTTON_PRESSED: Color = Color::srgba(0.15, 0.15, 0.25, 0.8);

pub fn outcome_message(state: GameState) -> &'static str {
    match state {
        GameState::Passed => "You Pass!",
        GameState::Failed => "You Fell Off!",
        GameState::Running => "",
    }
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud).add_systems(
            Update,
            (
                coordinate_button_interact.in_set(SessionSet::Input),
                (show_outcome_card, update_coordinate_readout).in_set(SessionSet::Present),
            ),
        );
    }
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                display: Display::None,
                ..default()
            },
            OutcomeCard,
        ))
        .with_children(|p| {
            p.spawn((
                Node {
                    padding: UiRect::all(Val::Px(24.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
            ))
            .with_children(|card| {
                card.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 42.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    OutcomeCardText,
                ));
            });
        });

    commands
        .spawn((
            Button,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(8.0),
                left: Val::Px(8.0),
                padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            LogCoordinatesButton,
        ))
        .with_children(|b| {
            b.spawn((
                Text::new("Log Coordinates"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });

    commands.spawn((
        Text::new(String::new()),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.75, 0.85, 0.95)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(46.0),
            left: Val::Px(8.0),
            ..default()
        },
        CoordinateReadoutText,
    ));
}

fn coordinate_button_interact(
    mut q_btn: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<LogCoordinatesButton>),
    >,
    mut requests: EventWriter<LogCoordinatesRequested>,
) {
    for (interaction, mut bg) in q_btn.iter_mut() {
        match *interaction {
            Interaction::Pressed => {
                *bg = BackgroundColor(BUTTON_PRESSED);
                requests.write(LogCoordinatesRequested);
            }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVER),
            Interaction::None => *bg = BackgroundColor(BUTTON_IDLE),
        }
    }
}

fn show_outcome_card(
    mut outcomes: EventReader<SessionOutcome>,
    mut q_card: Query<&mut Node, With<OutcomeCard>>,
    mut q_text: Query<&mut Text, With<OutcomeCardText>>,
) {
    let Some(SessionOutcome(outcome)) = outcomes.read().last().copied() else {
        return;
    };
    if let Ok(mut text) = q_text.single_mut() {
        text.0 = outcome_message(outcome.state).to_string();
    }
    if let Ok(mut node) = q_card.single_mut() {
        node.display = Display::Flex;
    }
}

fn update_coordinate_readout(
    readout: Res<CoordinateReadout>,
    mut q_text: Query<&mut Text, With<CoordinateReadoutText>>,
) {
    if !readout.is_changed() {
        return;
    }
    if let Ok(mut text) = q_text.single_mut() {
        text.0 = if readout.0.is_empty() {
            String::new()
        } else {
            format!("Ball Coordinates: {}", readout.0)
        };
    }
}
